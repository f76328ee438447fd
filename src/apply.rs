//! Applying a fully-specified action: edit first, then command.

use std::time::Duration;

use log::{debug, warn};
use lsp_types::{ExecuteCommandParams, WorkspaceEdit};

use crate::{
    action::{ActionCommand, ActionPayload, FixAction},
    config::FixConfig,
    document::WorkspaceEditSink,
    provider::{encode, ActionProvider, EXECUTE_COMMAND_METHOD},
};

/// Apply an action's payload. The inline edit goes through the sink in the
/// provider's declared encoding; the command is executed on the provider and
/// its acknowledgement awaited. Returns whether anything was applied.
pub(crate) fn apply_action(
    provider: &dyn ActionProvider,
    action: &FixAction,
    edits: &mut dyn WorkspaceEditSink,
    config: &FixConfig,
) -> bool {
    if action.disabled {
        debug!("`{}` is disabled; not applying", action.title);
        return false;
    }

    match &action.payload {
        ActionPayload::Empty => {
            debug!("`{}` has nothing to apply", action.title);
            false
        }
        ActionPayload::Edit(edit) => apply_workspace_edit(provider, edit, edits),
        ActionPayload::Command(command) => run_command(provider, command, config),
        ActionPayload::EditAndCommand(edit, command) => {
            let edited = apply_workspace_edit(provider, edit, edits);
            let ran = run_command(provider, command, config);
            edited || ran
        }
    }
}

fn apply_workspace_edit(
    provider: &dyn ActionProvider,
    edit: &WorkspaceEdit,
    edits: &mut dyn WorkspaceEditSink,
) -> bool {
    match edits.apply_edit(edit, provider.position_encoding()) {
        Ok(()) => true,
        Err(error) => {
            warn!("edit from {} not applied: {error}", provider.name());
            false
        }
    }
}

fn run_command(provider: &dyn ActionProvider, command: &ActionCommand, config: &FixConfig) -> bool {
    let (name, arguments) = command.clone().into_parts();
    let params = ExecuteCommandParams {
        command: name.clone(),
        arguments,
        work_done_progress_params: Default::default(),
    };
    let reply = provider.request(EXECUTE_COMMAND_METHOD, encode(&params));
    match reply.wait(Duration::from_millis(config.request_timeout_ms)) {
        Ok(_) => true,
        Err(error) => {
            warn!("command `{name}` failed on {}: {error}", provider.name());
            false
        }
    }
}
