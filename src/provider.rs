//! Provider abstraction and the asynchronous reply transport.
//!
//! A provider is an attached language-analysis service. The core never owns
//! one; it borrows them from a [`ProviderRegistry`] for the duration of a
//! single operation and talks to them through a request primitive that
//! returns a one-shot [`ReplyHandle`].
//!
//! The transport contract: every issued request must eventually deliver a
//! result, deliver an error, or drop its [`ReplySender`]. Provider
//! implementations enforce their own wire timeouts and surface them as
//! error replies, which is what keeps un-deadlined reply collection finite.

use std::{sync::Arc, time::Duration};

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::range::PositionEncoding;

/// `textDocument/codeAction`
pub const CODE_ACTION_METHOD: &str = "textDocument/codeAction";
/// `codeAction/resolve`
pub const RESOLVE_METHOD: &str = "codeAction/resolve";
/// `workspace/executeCommand`
pub const EXECUTE_COMMAND_METHOD: &str = "workspace/executeCommand";

/// Opaque provider identity, stable for the lifetime of the attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(pub u32);

/// A failed provider request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// No reply arrived within the wait budget.
    #[error("request timed out")]
    Timeout,
    /// The provider dropped the reply channel without answering.
    #[error("provider hung up")]
    Disconnected,
    /// The provider answered with a protocol error.
    #[error("{0}")]
    Rejected(String),
}

/// Sending half of a one-shot reply. Handed to the transport that will
/// eventually answer a request.
pub struct ReplySender {
    tx: Sender<Result<Value, ProviderError>>,
}

impl ReplySender {
    /// Deliver the reply. Consumes the sender so a reply is sent at most once.
    pub fn send(self, result: Result<Value, ProviderError>) {
        let _ = self.tx.send(result);
    }
}

/// Receiving half of a one-shot reply to a provider request.
pub struct ReplyHandle {
    rx: Receiver<Result<Value, ProviderError>>,
}

impl ReplyHandle {
    /// Create a pending reply and the sender that will complete it.
    pub fn channel() -> (ReplySender, ReplyHandle) {
        let (tx, rx) = bounded(1);
        (ReplySender { tx }, ReplyHandle { rx })
    }

    /// A reply that is already complete.
    pub fn ready(result: Result<Value, ProviderError>) -> ReplyHandle {
        let (sender, handle) = ReplyHandle::channel();
        sender.send(result);
        handle
    }

    /// Block until the reply arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Result<Value, ProviderError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ProviderError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(ProviderError::Disconnected),
        }
    }

    /// The underlying channel, for multiplexed collection.
    pub(crate) fn receiver(&self) -> &Receiver<Result<Value, ProviderError>> {
        &self.rx
    }
}

/// An attached action/diagnostic source.
pub trait ActionProvider {
    /// Stable identity within the registry.
    fn id(&self) -> ProviderId;

    /// Display name, used in notifications and picker labels.
    fn name(&self) -> &str;

    /// Whether the provider services the given protocol method.
    fn supports(&self, method: &str) -> bool;

    /// The position encoding the provider negotiated for ranges and edits.
    fn position_encoding(&self) -> PositionEncoding {
        PositionEncoding::Utf16
    }

    /// Issue a request. The reply arrives asynchronously on the handle.
    fn request(&self, method: &str, params: Value) -> ReplyHandle;
}

/// Source of the providers attached to the current document.
pub trait ProviderRegistry {
    /// Snapshot of the attached providers, taken once per operation.
    fn providers(&self) -> Vec<Arc<dyn ActionProvider>>;

    /// Re-fetch a provider by id. Returns `None` once it has detached, which
    /// the executor treats as "skip this item".
    fn get(&self, id: ProviderId) -> Option<Arc<dyn ActionProvider>>;
}

/// Serialize request params, falling back to `null` for unserializable input.
pub(crate) fn encode<T: Serialize>(params: &T) -> Value {
    serde_json::to_value(params).unwrap_or(Value::Null)
}
