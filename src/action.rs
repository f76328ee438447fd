//! Fix action data model and lenient wire decoding.
//!
//! Providers reply to `textDocument/codeAction` with a mixed list: full code
//! actions, bare protocol commands, and (from older servers) actions whose
//! `command` field is a plain string. Everything is decoded into [`FixAction`]
//! with an explicit [`ActionPayload`] variant per edit/command combination,
//! so downstream code matches on shape instead of probing optional fields.

use log::debug;
use lsp_types::{Command, WorkspaceEdit};
use serde::Deserialize;
use serde_json::Value;

use crate::provider::ProviderId;

/// The command half of an action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionCommand {
    /// A structured protocol command with a name and optional arguments.
    Structured(Command),
    /// A command given only by name. Executed with an empty argument list.
    Bare(String),
}

impl ActionCommand {
    /// The command name sent to `workspace/executeCommand`.
    pub fn name(&self) -> &str {
        match self {
            ActionCommand::Structured(command) => &command.command,
            ActionCommand::Bare(name) => name,
        }
    }

    /// Split into the request name and argument list.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        match self {
            ActionCommand::Structured(command) => {
                (command.command, command.arguments.unwrap_or_default())
            }
            ActionCommand::Bare(name) => (name, Vec::new()),
        }
    }
}

/// What applying an action performs.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    /// An inline workspace edit.
    Edit(Box<WorkspaceEdit>),
    /// A command executed on the provider.
    Command(ActionCommand),
    /// An edit followed by a command.
    EditAndCommand(Box<WorkspaceEdit>, ActionCommand),
    /// Nothing yet; resolving may fill this in.
    Empty,
}

impl ActionPayload {
    /// Combine the optional edit and command halves into a single variant.
    pub fn from_parts(edit: Option<WorkspaceEdit>, command: Option<ActionCommand>) -> Self {
        match (edit, command) {
            (Some(edit), Some(command)) => ActionPayload::EditAndCommand(Box::new(edit), command),
            (Some(edit), None) => ActionPayload::Edit(Box::new(edit)),
            (None, Some(command)) => ActionPayload::Command(command),
            (None, None) => ActionPayload::Empty,
        }
    }

    /// Whether the action needs no resolve round trip before it can be
    /// applied: it carries an inline edit or a structured command.
    pub fn is_fully_specified(&self) -> bool {
        match self {
            ActionPayload::Edit(_) | ActionPayload::EditAndCommand(..) => true,
            ActionPayload::Command(ActionCommand::Structured(_)) => true,
            ActionPayload::Command(ActionCommand::Bare(_)) | ActionPayload::Empty => false,
        }
    }
}

/// A remediation offered by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct FixAction {
    /// Human-readable title, also the dedup key together with the provider.
    pub title: String,
    /// Hierarchical dotted kind, e.g. `quickfix` or `source.fixAll`.
    pub kind: Option<String>,
    /// What applying this action performs.
    pub payload: ActionPayload,
    /// Marked preferred by the provider; sorts ahead of its peers.
    pub preferred: bool,
    /// Disabled actions are never presented or applied.
    pub disabled: bool,
    /// The action exactly as received, re-sent verbatim on resolve.
    pub raw: Value,
}

impl FixAction {
    /// Whether the action's kind prefix-matches `filter`.
    pub fn kind_matches(&self, filter: &str) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| crate::kind::kind_matches(kind, filter))
    }
}

/// Pairing of a provider identity and an action, the unit the executor and
/// the picker operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionItem {
    pub provider: ProviderId,
    pub provider_name: String,
    pub action: FixAction,
    /// The protocol range the query was scoped to, kept for display.
    pub range: lsp_types::Range,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAction {
    title: String,
    kind: Option<String>,
    edit: Option<WorkspaceEdit>,
    command: Option<Value>,
    /// Only present when the reply item is a bare protocol `Command`.
    arguments: Option<Vec<Value>>,
    is_preferred: Option<bool>,
    disabled: Option<WireDisabled>,
}

#[derive(Deserialize)]
struct WireDisabled {
    reason: String,
}

/// Decode one reply item. Returns `None` for shapes we cannot use.
pub(crate) fn decode_action(value: Value) -> Option<FixAction> {
    let wire: WireAction = serde_json::from_value(value.clone()).ok()?;

    let command = match wire.command {
        Some(Value::String(name)) => Some(match wire.arguments {
            // A top-level protocol `Command`: name and arguments are siblings.
            Some(arguments) => ActionCommand::Structured(Command {
                title: wire.title.clone(),
                command: name,
                arguments: Some(arguments),
            }),
            None => ActionCommand::Bare(name),
        }),
        Some(other) => serde_json::from_value::<Command>(other)
            .ok()
            .map(ActionCommand::Structured),
        None => None,
    };

    if let Some(disabled) = &wire.disabled {
        debug!("action `{}` is disabled: {}", wire.title, disabled.reason);
    }

    Some(FixAction {
        title: wire.title,
        kind: wire.kind,
        payload: ActionPayload::from_parts(wire.edit, command),
        preferred: wire.is_preferred.unwrap_or(false),
        disabled: wire.disabled.is_some(),
        raw: value,
    })
}

/// Decode a whole `textDocument/codeAction` reply.
pub(crate) fn decode_actions(value: Value) -> Vec<FixAction> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(decode_action).collect(),
        _ => Vec::new(),
    }
}
