//! Document-side collaborators: text access, diagnostics, and edits.
//!
//! The core never owns document state. It reads lines and a diagnostic
//! snapshot through [`DocumentAccess`] and hands workspace edits to a
//! [`WorkspaceEditSink`], both implemented by the host.

use lsp_types::{Diagnostic, Range, Url, WorkspaceEdit};
use thiserror::Error;

use crate::range::PositionEncoding;

/// An issue reported against the document, in editor coordinates.
///
/// `line` and `col` are zero-based; `col` is a byte offset into the line.
/// When the provider's native diagnostic is available it is kept in `origin`
/// and its range is authoritative, because editor and protocol coordinate
/// spaces diverge under multi-byte text.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDiagnostic {
    pub line: u32,
    pub col: u32,
    pub end_line: Option<u32>,
    pub end_col: Option<u32>,
    pub message: String,
    /// A protocol-shaped range, if the diagnostic source supplied one.
    pub range: Option<Range>,
    /// The provider-native diagnostic this was derived from.
    pub origin: Option<Diagnostic>,
}

impl BufferDiagnostic {
    pub fn new(line: u32, col: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            col,
            end_line: None,
            end_col: None,
            message: message.into(),
            range: None,
            origin: None,
        }
    }

    pub fn with_end(mut self, end_line: u32, end_col: u32) -> Self {
        self.end_line = Some(end_line);
        self.end_col = Some(end_col);
        self
    }

    pub fn with_origin(mut self, origin: Diagnostic) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Read access to the current document.
pub trait DocumentAccess {
    /// The document's uri, sent in every code-action request.
    fn uri(&self) -> Url;

    /// Number of lines in the buffer.
    fn line_count(&self) -> u32;

    /// The text of one line, without its terminator.
    fn line(&self, index: u32) -> Option<&str>;

    /// Snapshot of the document's diagnostics. Sampled once per query phase;
    /// the apply-all driver re-samples after the fix-all pass.
    fn diagnostics(&self) -> Vec<BufferDiagnostic>;
}

/// Failure to apply a workspace edit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to apply workspace edit: {reason}")]
pub struct EditError {
    pub reason: String,
}

impl EditError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Applies workspace edits to document state.
pub trait WorkspaceEditSink {
    /// Apply `edit`, interpreting its positions in `encoding`.
    fn apply_edit(&mut self, edit: &WorkspaceEdit, encoding: PositionEncoding)
        -> Result<(), EditError>;
}
