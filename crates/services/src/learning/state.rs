use chrono::{DateTime, Utc};
use legal_core::model::{
    LearningStats, Lesson, LessonId, Module, ModuleError, ModuleId, ModulePatch, ProgressMap,
};
use legal_core::{
    CONTINUE_LEARNING_LIMIT, DifficultyFilter, FilterSortSpec, ModuleView, NavIntent,
    NavigationState, SortKey, Transition, continue_learning, lock_flags, project,
};

use crate::loadable::Loadable;

/// A completion accepted by the backend but not yet seen in a progress fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingPatch {
    module: ModuleId,
    lesson: LessonId,
    at: DateTime<Utc>,
}

/// Everything the learning screen renders, owned in one place.
///
/// Mutated only through `LearningService`; a clone is a consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct LearningState {
    catalog: Vec<Module>,
    progress: ProgressMap,
    pending: Vec<PendingPatch>,
    navigation: NavigationState,
    spec: FilterSortSpec,
    stats: Loadable<LearningStats>,
    catalog_loading: bool,
    progress_loading: bool,
    completing: bool,
    loading_content: Option<ModuleId>,
    last_error: Option<String>,
}

impl LearningState {
    //
    // ─── READS ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn catalog(&self) -> &[Module] {
        &self.catalog
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    #[must_use]
    pub fn spec(&self) -> FilterSortSpec {
        self.spec
    }

    #[must_use]
    pub fn stats(&self) -> &Loadable<LearningStats> {
        &self.stats
    }

    /// Filtered and sorted catalog with per-module progress.
    #[must_use]
    pub fn modules(&self) -> Vec<ModuleView<'_>> {
        project(&self.catalog, self.spec, &self.progress)
    }

    /// Started-but-unfinished modules from the current projection.
    #[must_use]
    pub fn continue_learning(&self) -> Vec<ModuleView<'_>> {
        continue_learning(&self.modules(), CONTINUE_LEARNING_LIMIT)
    }

    #[must_use]
    pub fn selected_module(&self) -> Option<&Module> {
        self.navigation.module(&self.catalog)
    }

    #[must_use]
    pub fn selected_lesson(&self) -> Option<&Lesson> {
        self.navigation.lesson(&self.catalog)
    }

    /// Lock flags for the selected module's lessons.
    #[must_use]
    pub fn lesson_locks(&self) -> Vec<bool> {
        self.selected_module()
            .map(|module| lock_flags(module, &self.progress))
            .unwrap_or_default()
    }

    /// Catalog or progress still loading; the list shows a spinner.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.catalog_loading || self.progress_loading
    }

    #[must_use]
    pub fn is_completing(&self) -> bool {
        self.completing
    }

    #[must_use]
    pub fn is_loading_content(&self) -> bool {
        self.loading_content.is_some()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of completions still waiting for a confirming fetch.
    #[must_use]
    pub fn pending_patches(&self) -> usize {
        self.pending.len()
    }

    //
    // ─── CATALOG ───────────────────────────────────────────────────────────────
    //

    pub(crate) fn begin_catalog(&mut self) {
        self.catalog_loading = true;
    }

    /// Replace the catalog and drop navigation references it no longer holds.
    pub(crate) fn set_catalog(&mut self, catalog: Vec<Module>) -> Transition {
        self.catalog_loading = false;
        self.catalog = catalog;
        self.navigation.reconcile(&self.catalog)
    }

    pub(crate) fn catalog_failed(&mut self, message: String) {
        self.catalog_loading = false;
        self.last_error = Some(message);
    }

    pub(crate) fn begin_content(&mut self, module: &ModuleId) {
        self.loading_content = Some(module.clone());
    }

    /// Clear the content flag if it still belongs to `module`.
    pub(crate) fn end_content(&mut self, module: &ModuleId) {
        if self.loading_content.as_ref() == Some(module) {
            self.loading_content = None;
        }
    }

    /// Overlay detail content onto a catalog module.
    ///
    /// Unknown modules are ignored. Navigation is reconciled afterwards since the
    /// patched lesson list may differ from the summary.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError` if the patched lesson list is invalid.
    pub(crate) fn merge_content(
        &mut self,
        id: &ModuleId,
        patch: ModulePatch,
    ) -> Result<(), ModuleError> {
        if let Some(module) = self.catalog.iter_mut().find(|m| m.id() == id) {
            module.merge(patch)?;
            self.navigation.reconcile(&self.catalog);
        }
        Ok(())
    }

    //
    // ─── PROGRESS ──────────────────────────────────────────────────────────────
    //

    pub(crate) fn begin_progress(&mut self) {
        self.progress_loading = true;
    }

    pub(crate) fn progress_failed(&mut self, message: String) {
        self.progress_loading = false;
        self.last_error = Some(message);
    }

    /// Apply an authoritative fetch.
    ///
    /// The map is replaced wholesale. Pending patches the fetch already shows
    /// as completed are dropped; the rest are laid back on top, so a fetch
    /// that lags behind an accepted completion never un-completes a lesson.
    pub(crate) fn apply_progress_fetch(&mut self, fetched: ProgressMap) {
        self.progress_loading = false;
        self.progress.replace_all(fetched);
        let progress = &mut self.progress;
        self.pending.retain(|patch| {
            if progress.is_completed(&patch.module, &patch.lesson) {
                return false;
            }
            progress.mark_completed(&patch.module, &patch.lesson, patch.at);
            true
        });
    }

    /// Record an accepted completion locally before the confirming fetch.
    pub(crate) fn apply_optimistic(
        &mut self,
        module: &ModuleId,
        lesson: &LessonId,
        at: DateTime<Utc>,
    ) {
        self.progress.mark_completed(module, lesson, at);
        self.pending
            .retain(|patch| !(patch.module == *module && patch.lesson == *lesson));
        self.pending.push(PendingPatch {
            module: module.clone(),
            lesson: lesson.clone(),
            at,
        });
    }

    pub(crate) fn set_completing(&mut self, completing: bool) {
        self.completing = completing;
    }

    //
    // ─── STATS ─────────────────────────────────────────────────────────────────
    //

    pub(crate) fn begin_stats(&mut self) {
        self.stats.begin();
    }

    pub(crate) fn set_stats(&mut self, stats: LearningStats) {
        self.stats = Loadable::Ready(stats);
    }

    pub(crate) fn stats_failed(&mut self, message: String) {
        self.stats = Loadable::Failed(message);
    }

    //
    // ─── NAVIGATION & FILTERS ──────────────────────────────────────────────────
    //

    pub(crate) fn navigate(&mut self, intent: NavIntent) -> Transition {
        self.navigation.apply(intent, &self.catalog, &self.progress)
    }

    pub(crate) fn set_filter(&mut self, filter: DifficultyFilter) {
        self.spec.filter = filter;
    }

    pub(crate) fn set_sort(&mut self, sort: SortKey) {
        self.spec.sort = sort;
    }

    pub(crate) fn clear_filters(&mut self) {
        self.spec = FilterSortSpec::default();
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }
}
