//! Protocol range construction and position-encoding conversion.
//!
//! Editor columns are byte offsets; the protocol counts characters in the
//! encoding each provider negotiated. Diagnostics that carry their
//! provider-native form bypass conversion entirely, since that range is
//! already in the provider's coordinate space.

use lsp_types::{Position, Range};

use crate::document::{BufferDiagnostic, DocumentAccess};

/// Position encoding negotiated with a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionEncoding {
    Utf8,
    /// The protocol default.
    #[default]
    Utf16,
    Utf32,
}

impl PositionEncoding {
    /// Convert a byte column within `line` to a protocol character offset.
    ///
    /// Columns past the end of the line, or inside a multi-byte character,
    /// clamp to the nearest preceding boundary.
    pub fn column_to_protocol(self, line: &str, byte_col: u32) -> u32 {
        let clamped = (byte_col as usize).min(line.len());
        let boundary = if line.is_char_boundary(clamped) {
            clamped
        } else {
            line.char_indices()
                .map(|(index, _)| index)
                .take_while(|&index| index <= clamped)
                .last()
                .unwrap_or(0)
        };
        let prefix = &line[..boundary];

        match self {
            PositionEncoding::Utf8 => boundary as u32,
            PositionEncoding::Utf16 => prefix.encode_utf16().count() as u32,
            PositionEncoding::Utf32 => prefix.chars().count() as u32,
        }
    }
}

/// Build the protocol range for a diagnostic.
///
/// Preference order: the provider-native range, a protocol-shaped range the
/// diagnostic source supplied, and finally a range synthesized from editor
/// coordinates. A missing end defaults to a one-character span on the
/// diagnostic's own line.
pub fn diagnostic_range(
    document: &dyn DocumentAccess,
    diagnostic: &BufferDiagnostic,
    encoding: PositionEncoding,
) -> Range {
    if let Some(origin) = &diagnostic.origin {
        return origin.range;
    }
    if let Some(range) = diagnostic.range {
        return range;
    }

    let end_line = diagnostic.end_line.unwrap_or(diagnostic.line);
    let end_col = diagnostic.end_col.unwrap_or(diagnostic.col + 1);
    let start_text = document.line(diagnostic.line).unwrap_or("");
    let end_text = if end_line == diagnostic.line {
        start_text
    } else {
        document.line(end_line).unwrap_or("")
    };

    Range::new(
        Position::new(
            diagnostic.line,
            encoding.column_to_protocol(start_text, diagnostic.col),
        ),
        Position::new(end_line, encoding.column_to_protocol(end_text, end_col)),
    )
}

/// The range spanning the whole document: line 0, column 0 through the last
/// line's byte length. Used for document-wide fix queries.
pub fn document_range(document: &dyn DocumentAccess) -> Range {
    let last = document.line_count().saturating_sub(1);
    let last_len = document.line(last).map_or(0, |line| line.len() as u32);
    Range::new(Position::new(0, 0), Position::new(last, last_len))
}
