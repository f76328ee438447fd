//! Lazy action resolution.
//!
//! Many providers return lightweight actions and fill in the edit or command
//! only on request. Actions that already carry an inline edit or a
//! structured command skip the round trip entirely.

use std::time::Duration;

use log::{debug, warn};

use crate::{
    action::{decode_action, FixAction},
    config::FixConfig,
    provider::{ActionProvider, RESOLVE_METHOD},
};

/// Produce a fully-specified action, issuing a `codeAction/resolve` request
/// only when required. Resolution failures are soft: the original action is
/// returned and applying it degrades to a no-op.
pub(crate) fn resolve_action(
    provider: &dyn ActionProvider,
    action: FixAction,
    config: &FixConfig,
) -> FixAction {
    if action.payload.is_fully_specified() {
        return action;
    }
    if !provider.supports(RESOLVE_METHOD) {
        return action;
    }

    let reply = provider.request(RESOLVE_METHOD, action.raw.clone());
    match reply.wait(Duration::from_millis(config.request_timeout_ms)) {
        Ok(value) => match decode_action(value) {
            Some(resolved) => resolved,
            None => {
                debug!(
                    "{} returned an unusable resolve reply for `{}`",
                    provider.name(),
                    action.title
                );
                action
            }
        },
        Err(error) => {
            warn!(
                "resolving `{}` on {} failed: {error}; treating it as unresolved",
                action.title,
                provider.name()
            );
            action
        }
    }
}
