//! User-facing notification sink.
//!
//! Outcomes are reported through an injected trait so the core stays
//! testable without a real UI; hosts route these to their message area.

use strum_macros::Display;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Receives user-visible messages.
pub trait Notifier {
    fn notify(&mut self, severity: Severity, message: &str);
}

/// Routes notifications to the `log` facade, for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
    }
}
