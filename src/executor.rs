//! Completion-gated sequential application of action items.

use log::debug;

use crate::{
    action::ActionItem,
    apply::apply_action,
    config::FixConfig,
    document::WorkspaceEditSink,
    provider::ProviderRegistry,
    resolve::resolve_action,
};

/// Runs an ordered list of action items strictly one at a time.
///
/// Edits are positional: applying an earlier action can invalidate the
/// coordinates a later one was computed against, so item *i+1*'s resolve
/// never starts before item *i*'s apply has completed. Providers are
/// re-fetched from the registry at each item's turn; ids that have detached
/// in the meantime are skipped without counting.
pub struct SequentialExecutor<'a> {
    pub registry: &'a dyn ProviderRegistry,
    pub edits: &'a mut dyn WorkspaceEditSink,
    pub config: &'a FixConfig,
}

impl SequentialExecutor<'_> {
    /// Resolve and apply each item in order; returns the count actually
    /// applied.
    pub fn apply_all(&mut self, items: Vec<ActionItem>) -> usize {
        let mut applied = 0;
        for item in items {
            let Some(provider) = self.registry.get(item.provider) else {
                debug!(
                    "{} is no longer attached; skipping `{}`",
                    item.provider_name, item.action.title
                );
                continue;
            };
            let action = resolve_action(provider.as_ref(), item.action, self.config);
            if apply_action(provider.as_ref(), &action, self.edits, self.config) {
                applied += 1;
            }
        }
        applied
    }
}
