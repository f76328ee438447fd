//! Batched application and interactive selection of LSP code-action fixes.
//!
//! fixline drives `textDocument/codeAction` across every provider attached
//! to a document: it fans the query out concurrently, resolves
//! lazily-specified actions on demand, deduplicates and orders the results
//! deterministically, and applies them strictly one at a time so that an
//! earlier edit can never race the coordinates of a later one.
//!
//! Two entry points cover the two remediation classes:
//!
//! - [`FixOrchestrator::apply_all`] applies every document-wide
//!   `source.fixAll` action, then re-samples diagnostics and applies the
//!   remaining quickfixes.
//! - [`FixPicker::browse`] presents the quickfix candidates through a host
//!   selection UI and applies only the chosen subset.
//!
//! The host supplies the document, the providers, the edit applier, the
//! notification sink, and (for browsing) the selector, each as a small trait.
//!
//! # Example
//!
//! ```ignore
//! use fixline::{FixConfig, FixOrchestrator};
//!
//! let summary = FixOrchestrator::new(&registry, &document, &mut edits, &mut notifier)
//!     .with_config(FixConfig::new().with_request_timeout_ms(500))
//!     .apply_all();
//! println!("{}", summary.message());
//! ```

mod action;
mod apply;
mod config;
mod document;
mod executor;
mod fanout;
mod kind;
mod notify;
mod orchestrator;
mod picker;
mod provider;
mod range;
mod resolve;
#[cfg(test)]
mod test_support;

pub use action::{ActionCommand, ActionItem, ActionPayload, FixAction};
pub use config::FixConfig;
pub use document::{BufferDiagnostic, DocumentAccess, EditError, WorkspaceEditSink};
pub use executor::SequentialExecutor;
pub use kind::kind_matches;
pub use notify::{LogNotifier, Notifier, Severity};
pub use orchestrator::{FixOrchestrator, FixSummary};
pub use picker::{FixPicker, FixSelector};
pub use provider::{
    ActionProvider, ProviderError, ProviderId, ProviderRegistry, ReplyHandle, ReplySender,
    CODE_ACTION_METHOD, EXECUTE_COMMAND_METHOD, RESOLVE_METHOD,
};
pub use range::{diagnostic_range, document_range, PositionEncoding};
