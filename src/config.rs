//! Tunables for the fix engine.

use lsp_types::CodeActionKind;

/// Configuration shared by the apply-all driver and the picker.
#[derive(Debug, Clone, PartialEq)]
pub struct FixConfig {
    /// Kind filter for document-wide fix queries.
    pub fix_all_kind: CodeActionKind,
    /// Wait budget for resolve and executeCommand acknowledgements, in ms.
    pub request_timeout_ms: u64,
    /// Grace deadline for document-wide fan-out, in ms. Stragglers past it
    /// contribute nothing; their in-flight requests are not cancelled.
    pub fanout_grace_ms: u64,
    /// Pause after the fix-all pass so providers re-publish diagnostics, ms.
    pub settle_delay_ms: u64,
    /// Style picker labels with ANSI colors.
    pub use_ansi_coloring: bool,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            fix_all_kind: CodeActionKind::SOURCE_FIX_ALL,
            request_timeout_ms: 1_000,
            fanout_grace_ms: 100,
            settle_delay_ms: 100,
            use_ansi_coloring: false,
        }
    }
}

impl FixConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fix_all_kind(mut self, kind: CodeActionKind) -> Self {
        self.fix_all_kind = kind;
        self
    }

    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    pub fn with_ansi_coloring(mut self, enabled: bool) -> Self {
        self.use_ansi_coloring = enabled;
        self
    }
}
