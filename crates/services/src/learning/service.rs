use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use backend::LearningBackend;
use legal_core::model::{LessonId, ModuleId};
use legal_core::{DifficultyFilter, NavIntent, SortKey, Transition};

use crate::Clock;
use crate::error::LearningError;
use crate::learning::state::LearningState;

/// Owns the catalog, the progress cache and navigation for the learning screen.
///
/// Methods take `&self`; the state lock is never held across an await, so
/// status flags stay observable while a request is in flight.
#[derive(Clone)]
pub struct LearningService {
    clock: Clock,
    backend: Arc<dyn LearningBackend>,
    state: Arc<Mutex<LearningState>>,
}

impl LearningService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn LearningBackend>) -> Self {
        Self {
            clock,
            backend,
            state: Arc::new(Mutex::new(LearningState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, LearningState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consistent copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> LearningState {
        self.state().clone()
    }

    /// Borrow the live state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&LearningState) -> R) -> R {
        f(&self.state())
    }

    //
    // ─── REFRESH ───────────────────────────────────────────────────────────────
    //

    /// Fetch catalog, progress and stats together.
    ///
    /// Clears the previous error first.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the catalog could not be loaded. Progress and
    /// stats failures are recorded and logged only.
    pub async fn load(&self) -> Result<(), LearningError> {
        self.state().clear_error();
        let (catalog, progress, stats) = tokio::join!(
            self.fetch_catalog(),
            self.fetch_progress(),
            self.fetch_stats()
        );
        if let Err(err) = progress {
            tracing::warn!(error = %err, "progress refresh failed");
        }
        if let Err(err) = stats {
            tracing::warn!(error = %err, "stats refresh failed");
        }
        catalog
    }

    /// Refetch the catalog, clearing the previous error first.
    ///
    /// # Errors
    ///
    /// Returns `LearningError::Backend` if the catalog request fails.
    pub async fn refresh_catalog(&self) -> Result<(), LearningError> {
        self.state().clear_error();
        self.fetch_catalog().await
    }

    /// Refetch progress, clearing the previous error first.
    ///
    /// # Errors
    ///
    /// Returns `LearningError::Backend` if the progress request fails.
    pub async fn refresh_progress(&self) -> Result<(), LearningError> {
        self.state().clear_error();
        self.fetch_progress().await
    }

    /// # Errors
    ///
    /// Returns `LearningError::Backend` if the stats request fails.
    pub async fn refresh_stats(&self) -> Result<(), LearningError> {
        self.fetch_stats().await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_catalog(&self) -> Result<(), LearningError> {
        self.state().begin_catalog();
        match self.backend.catalog().await {
            Ok(catalog) => {
                tracing::debug!(modules = catalog.len(), "catalog loaded");
                if self.state().set_catalog(catalog).moved() {
                    tracing::debug!("navigation fell back after catalog refresh");
                }
                Ok(())
            }
            Err(err) => {
                self.state().catalog_failed(err.user_message());
                Err(err.into())
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_progress(&self) -> Result<(), LearningError> {
        self.state().begin_progress();
        match self.backend.progress().await {
            Ok(progress) => {
                self.state().apply_progress_fetch(progress);
                Ok(())
            }
            Err(err) => {
                self.state().progress_failed(err.user_message());
                Err(err.into())
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_stats(&self) -> Result<(), LearningError> {
        self.state().begin_stats();
        match self.backend.stats().await {
            Ok(stats) => {
                self.state().set_stats(stats);
                Ok(())
            }
            Err(err) => {
                self.state().stats_failed(err.user_message());
                Err(err.into())
            }
        }
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Open a module, then merge its detail content.
    ///
    /// The transition happens before the request and clears the previous error.
    /// A failed content request keeps the summary data and is reported through
    /// [`Self::last_error`].
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn select_module(&self, id: &ModuleId) -> Transition {
        {
            let mut state = self.state();
            if !state.navigate(NavIntent::SelectModule(id.clone())).moved() {
                return Transition::Ignored;
            }
            state.clear_error();
            state.begin_content(id);
        }

        let content = self.backend.module_content(id).await;

        let mut state = self.state();
        state.end_content(id);
        match content {
            Ok(patch) => {
                if let Err(err) = state.merge_content(id, patch) {
                    tracing::warn!(module = %id, error = %err, "discarding invalid module content");
                    state.record_error(err.to_string());
                }
            }
            Err(err) => {
                tracing::warn!(module = %id, error = %err, "module content request failed");
                state.record_error(err.user_message());
            }
        }
        Transition::Moved
    }

    /// Open a lesson of the selected module. Locked or unknown lessons are ignored.
    pub fn select_lesson(&self, id: &LessonId) -> Transition {
        self.state().navigate(NavIntent::SelectLesson(id.clone()))
    }

    pub fn back(&self) -> Transition {
        self.state().navigate(NavIntent::Back)
    }

    //
    // ─── COMPLETION ────────────────────────────────────────────────────────────
    //

    /// Mark the open lesson as completed.
    ///
    /// The local cache changes only after the backend accepts the update; the
    /// record is stamped from the service clock and progress and stats are
    /// refetched. Navigation never changes.
    ///
    /// # Errors
    ///
    /// Returns `LearningError::Busy` while another completion is pending,
    /// `LearningError::NotInLesson` outside a lesson view, and
    /// `LearningError::Backend` if the update is rejected.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn complete_lesson(&self) -> Result<(), LearningError> {
        let (module, lesson) = {
            let mut state = self.state();
            if state.is_completing() {
                return Err(LearningError::Busy);
            }
            let nav = state.navigation();
            let (Some(module), Some(lesson)) = (nav.module_id().cloned(), nav.lesson_id().cloned())
            else {
                return Err(LearningError::NotInLesson);
            };
            state.set_completing(true);
            state.clear_error();
            (module, lesson)
        };

        let result = self.backend.update_progress(&module, &lesson, true).await;

        {
            let mut state = self.state();
            state.set_completing(false);
            if let Err(err) = result {
                tracing::warn!(%module, %lesson, error = %err, "progress update rejected");
                state.record_error(err.user_message());
                return Err(err.into());
            }
            state.apply_optimistic(&module, &lesson, self.clock.now());
        }
        tracing::info!(%module, %lesson, "lesson completed");

        let (progress, stats) = tokio::join!(self.fetch_progress(), self.fetch_stats());
        if let Err(err) = progress {
            tracing::warn!(error = %err, "progress refetch after completion failed");
        }
        if let Err(err) = stats {
            tracing::warn!(error = %err, "stats refetch after completion failed");
        }
        Ok(())
    }

    //
    // ─── FILTERS ───────────────────────────────────────────────────────────────
    //

    pub fn set_filter(&self, filter: DifficultyFilter) {
        self.state().set_filter(filter);
    }

    pub fn set_sort(&self, sort: SortKey) {
        self.state().set_sort(sort);
    }

    pub fn clear_filters(&self) {
        self.state().clear_filters();
    }

    //
    // ─── STATUS ────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn is_completing(&self) -> bool {
        self.state().is_completing()
    }

    #[must_use]
    pub fn is_loading_content(&self) -> bool {
        self.state().is_loading_content()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error().map(str::to_owned)
    }

    pub fn clear_error(&self) {
        self.state().clear_error();
    }
}
