//! Interactive browsing of point-fix actions.
//!
//! Runs the same point-fix query as the apply-all driver but substitutes a
//! selection step for automatic application: results are formatted one per
//! line, handed to the host's selection UI, and only the chosen subset is
//! applied.

use itertools::Itertools;
use nu_ansi_term::{ansi::RESET, Style};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::ActionItem,
    config::FixConfig,
    document::{DocumentAccess, WorkspaceEditSink},
    executor::SequentialExecutor,
    fanout::{eligible_providers, point_fix_query},
    notify::{Notifier, Severity},
    orchestrator::NO_PROVIDER_MESSAGE,
    provider::ProviderRegistry,
};

/// Selection UI collaborator: presents labeled entries and returns the
/// indices of 0..N choices. Single-select hosts return at most one index.
pub trait FixSelector {
    fn pick(&mut self, items: &[String], multi_select: bool) -> Vec<usize>;
}

/// Browses point-fix actions and applies the user's chosen subset.
pub struct FixPicker<'h> {
    registry: &'h dyn ProviderRegistry,
    document: &'h dyn DocumentAccess,
    edits: &'h mut dyn WorkspaceEditSink,
    notifier: &'h mut dyn Notifier,
    selector: &'h mut dyn FixSelector,
    config: FixConfig,
}

impl<'h> FixPicker<'h> {
    pub fn new(
        registry: &'h dyn ProviderRegistry,
        document: &'h dyn DocumentAccess,
        edits: &'h mut dyn WorkspaceEditSink,
        notifier: &'h mut dyn Notifier,
        selector: &'h mut dyn FixSelector,
    ) -> Self {
        Self {
            registry,
            document,
            edits,
            notifier,
            selector,
            config: FixConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FixConfig) -> Self {
        self.config = config;
        self
    }

    /// Query, present, and apply the chosen fixes; returns the applied count.
    pub fn browse(&mut self) -> usize {
        let providers = eligible_providers(&self.registry.providers());
        if providers.is_empty() {
            self.notifier.notify(Severity::Warning, NO_PROVIDER_MESSAGE);
            return 0;
        }

        let diagnostics = self.document.diagnostics();
        if diagnostics.is_empty() {
            self.notifier
                .notify(Severity::Info, "No diagnostics in the current document");
            return 0;
        }

        // Kept undeduplicated: each entry is tied to its own diagnostic.
        let items = point_fix_query(&providers, self.document, &diagnostics);
        if items.is_empty() {
            self.notifier
                .notify(Severity::Info, "No quickfix actions available");
            return 0;
        }

        let labels = format_labels(&items, self.config.use_ansi_coloring);
        let chosen: Vec<ActionItem> = self
            .selector
            .pick(&labels, true)
            .into_iter()
            .unique()
            .filter_map(|index| items.get(index).cloned())
            .collect();
        if chosen.is_empty() {
            self.notifier.notify(Severity::Info, "No fixes selected");
            return 0;
        }

        let mut executor = SequentialExecutor {
            registry: self.registry,
            edits: &mut *self.edits,
            config: &self.config,
        };
        let applied = executor.apply_all(chosen);
        self.notifier
            .notify(Severity::Info, &format!("Applied {applied} fix(es)"));
        applied
    }
}

/// One display line per item: `[provider] title @line:column`, 1-based, with
/// the provider column width-aligned across the list.
fn format_labels(items: &[ActionItem], use_ansi_coloring: bool) -> Vec<String> {
    let name_width = items
        .iter()
        .map(|item| item.provider_name.width())
        .max()
        .unwrap_or(0);

    items
        .iter()
        .map(|item| {
            let line = item.range.start.line + 1;
            let column = item.range.start.character + 1;
            let pad = " ".repeat(name_width - item.provider_name.width());
            if use_ansi_coloring {
                let tag_style = Style::new().dimmed();
                format!(
                    "{}[{}]{RESET}{pad} {} {}@{line}:{column}{RESET}",
                    tag_style.prefix(),
                    item.provider_name,
                    item.action.title,
                    tag_style.prefix(),
                )
            } else {
                format!(
                    "[{}]{pad} {} @{line}:{column}",
                    item.provider_name, item.action.title
                )
            }
        })
        .collect()
}
