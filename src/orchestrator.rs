//! Two-phase apply-all driver.
//!
//! Phase one queries and applies document-wide fix-all actions; phase two
//! re-samples diagnostics and applies quickfixes. Either phase may be empty;
//! both degrade to a notification rather than an error.

use std::{thread, time::Duration};

use itertools::Itertools;
use log::debug;

use crate::{
    action::ActionItem,
    config::FixConfig,
    document::{DocumentAccess, WorkspaceEditSink},
    executor::SequentialExecutor,
    fanout::{document_fix_query, eligible_providers, point_fix_query},
    notify::{Notifier, Severity},
    provider::ProviderRegistry,
};

pub(crate) const NO_PROVIDER_MESSAGE: &str =
    "No code action provider attached to the current document";

/// Counts reported after an apply-all run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixSummary {
    pub fix_all_applied: usize,
    pub quickfixes_applied: usize,
}

impl FixSummary {
    pub fn total(&self) -> usize {
        self.fix_all_applied + self.quickfixes_applied
    }

    /// The user-facing outcome line.
    pub fn message(&self) -> String {
        match (self.fix_all_applied, self.quickfixes_applied) {
            (0, 0) => "No fix actions available for this document".to_string(),
            (f, 0) => format!("{f} fixAll action(s); no quickfixes left."),
            (0, q) => format!("{q} quickfix(es) applied."),
            (f, q) => format!("{f} fixAll action(s); {q} quickfix(es) applied."),
        }
    }
}

/// Keep the first occurrence per (provider, title) pair.
pub(crate) fn dedupe_by_provider_title(items: Vec<ActionItem>) -> Vec<ActionItem> {
    items
        .into_iter()
        .unique_by(|item| (item.provider, item.action.title.clone()))
        .collect()
}

/// Preferred actions first, then ascending by title; stable among equals.
pub(crate) fn sort_preferred_first(items: &mut [ActionItem]) {
    items.sort_by(|a, b| {
        b.action
            .preferred
            .cmp(&a.action.preferred)
            .then_with(|| a.action.title.cmp(&b.action.title))
    });
}

/// Applies every available remediation for the current document: fix-all
/// actions first, remaining quickfixes second.
pub struct FixOrchestrator<'h> {
    registry: &'h dyn ProviderRegistry,
    document: &'h dyn DocumentAccess,
    edits: &'h mut dyn WorkspaceEditSink,
    notifier: &'h mut dyn Notifier,
    config: FixConfig,
}

impl<'h> FixOrchestrator<'h> {
    pub fn new(
        registry: &'h dyn ProviderRegistry,
        document: &'h dyn DocumentAccess,
        edits: &'h mut dyn WorkspaceEditSink,
        notifier: &'h mut dyn Notifier,
    ) -> Self {
        Self {
            registry,
            document,
            edits,
            notifier,
            config: FixConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FixConfig) -> Self {
        self.config = config;
        self
    }

    /// Run both phases and notify the combined outcome.
    pub fn apply_all(&mut self) -> FixSummary {
        let providers = eligible_providers(&self.registry.providers());
        if providers.is_empty() {
            self.notifier.notify(Severity::Warning, NO_PROVIDER_MESSAGE);
            return FixSummary::default();
        }

        let fix_all = document_fix_query(&providers, self.document, &self.config);
        let fix_all_applied = if fix_all.is_empty() {
            0
        } else {
            let mut items = dedupe_by_provider_title(fix_all);
            sort_preferred_first(&mut items);
            debug!("applying {} document-wide fix action(s)", items.len());
            let mut executor = SequentialExecutor {
                registry: self.registry,
                edits: &mut *self.edits,
                config: &self.config,
            };
            let applied = executor.apply_all(items);
            // Give providers a moment to re-publish diagnostics against the
            // edited document before sampling them.
            if self.config.settle_delay_ms > 0 {
                thread::sleep(Duration::from_millis(self.config.settle_delay_ms));
            }
            applied
        };

        let diagnostics = self.document.diagnostics();
        let quickfixes_applied = if diagnostics.is_empty() {
            0
        } else {
            // Deliberately not deduplicated: distinct diagnostics can produce
            // identically-titled but differently-scoped fixes.
            let mut items = point_fix_query(&providers, self.document, &diagnostics);
            sort_preferred_first(&mut items);
            debug!("applying {} quickfix action(s)", items.len());
            let mut executor = SequentialExecutor {
                registry: self.registry,
                edits: &mut *self.edits,
                config: &self.config,
            };
            executor.apply_all(items)
        };

        let summary = FixSummary {
            fix_all_applied,
            quickfixes_applied,
        };
        self.notifier.notify(Severity::Info, &summary.message());
        summary
    }
}
