//! Concurrent code-action queries across providers.
//!
//! All requests for a query are put in flight at once; replies are consumed
//! one at a time off a channel multiplexer, so the accumulating result list
//! never needs locking. A query finishes when every outstanding reply has
//! arrived. Document-wide queries additionally stop at a short grace
//! deadline, writing off the stragglers.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam::channel::Select;
use log::{debug, warn};
use lsp_types::{
    CodeActionContext, CodeActionKind, CodeActionParams, Diagnostic, Range,
    TextDocumentIdentifier, Url,
};
use strum_macros::Display;

use crate::{
    action::{decode_actions, ActionItem, FixAction},
    config::FixConfig,
    document::{BufferDiagnostic, DocumentAccess},
    provider::{encode, ActionProvider, ProviderId, ReplyHandle, CODE_ACTION_METHOD},
    range::{diagnostic_range, document_range},
};

/// How a point-fix round asks for and filters actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
enum QueryStrategy {
    /// Request with `only = [quickfix]`, keep kind-matched actions.
    Strict,
    /// Request unfiltered, keep kind-matched or preferred actions.
    BestEffort,
}

/// One in-flight request and the identity its results inherit.
struct OutstandingRequest {
    provider: ProviderId,
    provider_name: String,
    range: Range,
    reply: ReplyHandle,
}

/// Providers that can answer code-action requests at all.
pub(crate) fn eligible_providers(
    providers: &[Arc<dyn ActionProvider>],
) -> Vec<Arc<dyn ActionProvider>> {
    providers
        .iter()
        .filter(|provider| provider.supports(CODE_ACTION_METHOD))
        .cloned()
        .collect()
}

fn code_action_params(
    uri: Url,
    range: Range,
    diagnostics: Vec<Diagnostic>,
    only: Option<Vec<CodeActionKind>>,
) -> CodeActionParams {
    CodeActionParams {
        text_document: TextDocumentIdentifier { uri },
        range,
        context: CodeActionContext {
            diagnostics,
            only,
            trigger_kind: None,
        },
        work_done_progress_params: Default::default(),
        partial_result_params: Default::default(),
    }
}

/// Drain every outstanding reply into a result list.
///
/// Replies are decoded, filtered through `accept`, and appended in arrival
/// order. With a `grace` deadline the wait is capped; without one it runs
/// until the outstanding count reaches zero, which the provider transport
/// contract keeps finite.
fn collect_actions(
    pending: Vec<OutstandingRequest>,
    grace: Option<Duration>,
    accept: &dyn Fn(&FixAction) -> bool,
) -> Vec<ActionItem> {
    let mut results = Vec::new();
    if pending.is_empty() {
        return results;
    }

    let deadline = grace.map(|grace| Instant::now() + grace);
    let mut answered = vec![false; pending.len()];
    let mut outstanding = pending.len();

    let mut select = Select::new();
    for request in &pending {
        select.recv(request.reply.receiver());
    }

    while outstanding > 0 {
        let operation = match deadline {
            Some(deadline) => match select.select_deadline(deadline) {
                Ok(operation) => operation,
                Err(_) => {
                    for (index, request) in pending.iter().enumerate() {
                        if !answered[index] {
                            debug!(
                                "dropping straggler reply from {} after grace timeout",
                                request.provider_name
                            );
                        }
                    }
                    break;
                }
            },
            None => select.select(),
        };

        let index = operation.index();
        let request = &pending[index];
        match operation.recv(request.reply.receiver()) {
            Ok(Ok(value)) => {
                for action in decode_actions(value) {
                    if accept(&action) {
                        results.push(ActionItem {
                            provider: request.provider,
                            provider_name: request.provider_name.clone(),
                            action,
                            range: request.range,
                        });
                    }
                }
            }
            Ok(Err(error)) => {
                warn!(
                    "code action request to {} failed: {error}",
                    request.provider_name
                );
            }
            Err(_) => {
                debug!("{} dropped its reply channel", request.provider_name);
            }
        }
        select.remove(index);
        answered[index] = true;
        outstanding -= 1;
    }

    results
}

/// Document-wide fix query: one request per provider, scoped to the whole
/// document and filtered to the configured fix-all kind.
pub(crate) fn document_fix_query(
    providers: &[Arc<dyn ActionProvider>],
    document: &dyn DocumentAccess,
    config: &FixConfig,
) -> Vec<ActionItem> {
    let range = document_range(document);
    let pending = providers
        .iter()
        .map(|provider| {
            let params = code_action_params(
                document.uri(),
                range,
                Vec::new(),
                Some(vec![config.fix_all_kind.clone()]),
            );
            OutstandingRequest {
                provider: provider.id(),
                provider_name: provider.name().to_string(),
                range,
                reply: provider.request(CODE_ACTION_METHOD, encode(&params)),
            }
        })
        .collect();

    let fix_all_kind = config.fix_all_kind.as_str().to_string();
    collect_actions(
        pending,
        Some(Duration::from_millis(config.fanout_grace_ms)),
        &|action| !action.disabled && action.kind_matches(&fix_all_kind),
    )
}

/// One point-fix round: a request per provider×diagnostic pair, each scoped
/// to that diagnostic's range with the diagnostic in the request context.
fn point_fix_round(
    providers: &[Arc<dyn ActionProvider>],
    document: &dyn DocumentAccess,
    diagnostics: &[BufferDiagnostic],
    strategy: QueryStrategy,
) -> Vec<ActionItem> {
    let mut pending = Vec::new();
    for provider in providers {
        let encoding = provider.position_encoding();
        for diagnostic in diagnostics {
            let range = diagnostic_range(document, diagnostic, encoding);
            let context_diagnostic = diagnostic.origin.clone().unwrap_or_else(|| Diagnostic {
                range,
                message: diagnostic.message.clone(),
                ..Diagnostic::default()
            });
            let only = match strategy {
                QueryStrategy::Strict => Some(vec![CodeActionKind::QUICKFIX]),
                QueryStrategy::BestEffort => None,
            };
            let params =
                code_action_params(document.uri(), range, vec![context_diagnostic], only);
            pending.push(OutstandingRequest {
                provider: provider.id(),
                provider_name: provider.name().to_string(),
                range,
                reply: provider.request(CODE_ACTION_METHOD, encode(&params)),
            });
        }
    }

    let quickfix = CodeActionKind::QUICKFIX.as_str().to_string();
    let accept = move |action: &FixAction| {
        if action.disabled {
            return false;
        }
        match strategy {
            QueryStrategy::Strict => action.kind_matches(&quickfix),
            QueryStrategy::BestEffort => action.kind_matches(&quickfix) || action.preferred,
        }
    };
    collect_actions(pending, None, &accept)
}

/// Point-fix query: strict first, best-effort only when strict found
/// nothing. Some providers only honor an explicit `only` filter while
/// others only mark relevance with the preferred flag.
pub(crate) fn point_fix_query(
    providers: &[Arc<dyn ActionProvider>],
    document: &dyn DocumentAccess,
    diagnostics: &[BufferDiagnostic],
) -> Vec<ActionItem> {
    let strict = point_fix_round(providers, document, diagnostics, QueryStrategy::Strict);
    if !strict.is_empty() {
        return strict;
    }
    debug!(
        "{} query found nothing; retrying {}",
        QueryStrategy::Strict,
        QueryStrategy::BestEffort
    );
    point_fix_round(providers, document, diagnostics, QueryStrategy::BestEffort)
}
