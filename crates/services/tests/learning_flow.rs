use std::sync::Arc;

use async_trait::async_trait;
use backend::{BackendError, InMemoryBackend, LearningBackend, Operation};
use legal_core::model::{
    Difficulty, LearningStats, Lesson, LessonId, Module, ModuleId, ModulePatch, ProgressMap,
    ProgressRecord,
};
use legal_core::time::{fixed_clock, fixed_now};
use legal_core::{DifficultyFilter, NavigationState, SortKey, Transition, module_percentage};
use services::{LearningError, LearningService};
use tokio::sync::Notify;

fn contracts() -> Module {
    Module::new(
        ModuleId::new("contracts"),
        "Contracts",
        Difficulty::Beginner,
        vec![
            Lesson::new(LessonId::new("A"), "Offer"),
            Lesson::new(LessonId::new("B"), "Acceptance"),
        ],
    )
    .unwrap()
}

fn module(id: &str, title: &str, difficulty: Difficulty) -> Module {
    Module::new(ModuleId::new(id), title, difficulty, Vec::new()).unwrap()
}

async fn service_with(catalog: Vec<Module>) -> (InMemoryBackend, LearningService) {
    let backend = InMemoryBackend::new().with_clock(fixed_clock());
    backend.set_catalog(catalog);
    let service = LearningService::new(fixed_clock(), Arc::new(backend.clone()));
    service.load().await.unwrap();
    (backend, service)
}

fn contracts_id() -> ModuleId {
    ModuleId::new("contracts")
}

#[tokio::test]
async fn completing_first_lesson_unlocks_the_second() {
    let (backend, learning) = service_with(vec![contracts()]).await;

    let state = learning.snapshot();
    assert_eq!(state.modules()[0].percentage, 0);

    assert!(learning.select_module(&contracts_id()).await.moved());
    assert_eq!(learning.snapshot().lesson_locks(), vec![false, true]);
    assert_eq!(learning.select_lesson(&LessonId::new("B")), Transition::Ignored);

    assert!(learning.select_lesson(&LessonId::new("A")).moved());
    learning.complete_lesson().await.unwrap();

    let state = learning.snapshot();
    assert!(state.progress().is_completed(&contracts_id(), &LessonId::new("A")));
    assert_eq!(state.lesson_locks(), vec![false, false]);
    assert_eq!(module_percentage(&contracts(), state.progress()), 50);
    assert_eq!(
        state.navigation(),
        &NavigationState::LessonDetail {
            module: contracts_id(),
            lesson: LessonId::new("A"),
        }
    );
    assert_eq!(state.pending_patches(), 0);
    assert_eq!(backend.calls(Operation::UpdateProgress), 1);
    assert_eq!(backend.calls(Operation::Progress), 2);

    assert!(learning.back().moved());
    assert_eq!(
        learning.snapshot().navigation(),
        &NavigationState::ModuleDetail {
            module: contracts_id()
        }
    );
    assert!(learning.select_lesson(&LessonId::new("B")).moved());
}

#[tokio::test]
async fn completion_is_stamped_from_the_service_clock() {
    let (_, learning) = service_with(vec![contracts()]).await;
    learning.select_module(&contracts_id()).await;
    learning.select_lesson(&LessonId::new("A"));

    learning.complete_lesson().await.unwrap();

    let record = learning
        .snapshot()
        .progress()
        .record(&contracts_id(), &LessonId::new("A"))
        .copied();
    assert_eq!(record, Some(ProgressRecord::completed_at(fixed_now())));
}

#[tokio::test]
async fn rejected_completion_leaves_cache_untouched() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    learning.select_module(&contracts_id()).await;
    learning.select_lesson(&LessonId::new("A"));
    backend.fail(Operation::UpdateProgress, "Lesson not found");

    let err = learning.complete_lesson().await.unwrap_err();

    assert!(matches!(err, LearningError::Backend(_)));
    assert_eq!(err.user_message(), "Lesson not found");
    let state = learning.snapshot();
    assert!(state.progress().is_empty());
    assert!(!state.is_completing());
    assert_eq!(state.last_error(), Some("Lesson not found"));
    assert_eq!(backend.calls(Operation::Progress), 1);
}

#[tokio::test]
async fn completion_outside_a_lesson_is_rejected() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    learning.select_module(&contracts_id()).await;

    let err = learning.complete_lesson().await.unwrap_err();

    assert!(matches!(err, LearningError::NotInLesson));
    assert_eq!(backend.calls(Operation::UpdateProgress), 0);
}

#[tokio::test]
async fn refetch_that_lags_keeps_the_completion() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    learning.select_module(&contracts_id()).await;
    learning.select_lesson(&LessonId::new("A"));

    learning.complete_lesson().await.unwrap();
    // Backend loses the write; the next fetch no longer reflects it.
    backend.set_progress(ProgressMap::new());
    learning.refresh_progress().await.unwrap();

    let state = learning.snapshot();
    assert!(state.progress().is_completed(&contracts_id(), &LessonId::new("A")));
    assert_eq!(state.pending_patches(), 1);
}

#[tokio::test]
async fn module_content_is_merged_after_selection() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    backend.set_module_content(
        contracts_id(),
        ModulePatch {
            description: Some("Formation, performance and breach.".into()),
            lessons: Some(vec![
                Lesson::new(LessonId::new("A"), "Offer")
                    .with_content(Some("<p>An offer is...</p>".into())),
                Lesson::new(LessonId::new("B"), "Acceptance"),
            ]),
            ..ModulePatch::default()
        },
    );

    learning.select_module(&contracts_id()).await;

    let state = learning.snapshot();
    let selected = state.selected_module().unwrap();
    assert_eq!(selected.description(), "Formation, performance and breach.");
    assert_eq!(selected.lessons()[0].content(), Some("<p>An offer is...</p>"));
    assert!(!state.is_loading_content());
}

#[tokio::test]
async fn failed_module_content_keeps_summary() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    backend.fail(Operation::ModuleContent, "detail unavailable");

    assert!(learning.select_module(&contracts_id()).await.moved());

    let state = learning.snapshot();
    assert_eq!(state.selected_module(), Some(&contracts()));
    assert_eq!(state.last_error(), Some("detail unavailable"));
    assert!(!state.is_loading_content());
}

#[tokio::test]
async fn content_retry_clears_the_previous_error() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    backend.fail(Operation::ModuleContent, "detail unavailable");
    learning.select_module(&contracts_id()).await;
    assert!(learning.back().moved());

    backend.recover(Operation::ModuleContent);
    assert!(learning.select_module(&contracts_id()).await.moved());

    assert_eq!(learning.last_error(), None);
}

#[tokio::test]
async fn catalog_retry_clears_the_previous_error() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    backend.fail(Operation::Catalog, "catalog offline");
    learning.refresh_catalog().await.unwrap_err();
    assert_eq!(learning.last_error().as_deref(), Some("catalog offline"));

    backend.recover(Operation::Catalog);
    learning.refresh_catalog().await.unwrap();

    assert_eq!(learning.last_error(), None);
}

#[tokio::test]
async fn progress_retry_clears_the_previous_error() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    backend.fail(Operation::Progress, "progress offline");
    learning.refresh_progress().await.unwrap_err();

    backend.recover(Operation::Progress);
    learning.refresh_progress().await.unwrap();

    assert_eq!(learning.last_error(), None);
}

#[tokio::test]
async fn opening_a_module_drops_a_stale_load_error() {
    let backend = InMemoryBackend::new().with_clock(fixed_clock());
    backend.set_catalog(vec![contracts()]);
    backend.fail(Operation::Progress, "progress offline");
    let learning = LearningService::new(fixed_clock(), Arc::new(backend.clone()));
    learning.load().await.unwrap();
    assert_eq!(learning.last_error().as_deref(), Some("progress offline"));

    learning.select_module(&contracts_id()).await;

    assert_eq!(learning.last_error(), None);
}

#[tokio::test]
async fn unknown_module_selection_makes_no_request() {
    let (backend, learning) = service_with(vec![contracts()]).await;

    assert_eq!(
        learning.select_module(&ModuleId::new("torts")).await,
        Transition::Ignored
    );
    assert_eq!(backend.calls(Operation::ModuleContent), 0);
}

#[tokio::test]
async fn filters_and_sorts_drive_the_projection() {
    let (_, learning) = service_with(vec![
        module("m1", "Torts", Difficulty::Advanced),
        module("m2", "Contracts", Difficulty::Beginner),
        module("m3", "Administrative Law", Difficulty::Advanced),
    ])
    .await;

    learning.set_filter(DifficultyFilter::Advanced);
    learning.set_sort(SortKey::Alphabetical);
    let titles: Vec<String> = learning.with_state(|state| {
        state
            .modules()
            .iter()
            .map(|view| view.module.title().to_owned())
            .collect()
    });
    assert_eq!(titles, vec!["Administrative Law", "Torts"]);

    learning.clear_filters();
    assert_eq!(learning.with_state(|state| state.modules().len()), 3);
}

#[tokio::test]
async fn catalog_refresh_drops_stale_navigation() {
    let (backend, learning) = service_with(vec![contracts()]).await;
    learning.select_module(&contracts_id()).await;
    learning.select_lesson(&LessonId::new("A"));

    backend.set_catalog(Vec::new());
    learning.refresh_catalog().await.unwrap();

    assert_eq!(learning.snapshot().navigation(), &NavigationState::Catalog);
}

#[tokio::test]
async fn load_reports_catalog_failure_and_keeps_stats() {
    let backend = InMemoryBackend::new();
    backend.fail(Operation::Catalog, "catalog offline");
    backend.set_stats(LearningStats {
        total_lessons: 10,
        ..LearningStats::default()
    });
    let learning = LearningService::new(fixed_clock(), Arc::new(backend.clone()));

    let err = learning.load().await.unwrap_err();

    assert_eq!(err.user_message(), "catalog offline");
    let state = learning.snapshot();
    assert_eq!(state.last_error(), Some("catalog offline"));
    assert!(!state.is_loading());
    assert_eq!(state.stats().ready().map(|s| s.total_lessons), Some(10));
}

//
// ─── CONCURRENCY ───────────────────────────────────────────────────────────────
//

/// Holds one backend operation until the test releases it.
#[derive(Clone)]
struct GatedBackend {
    inner: InMemoryBackend,
    gated: Operation,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl GatedBackend {
    fn new(inner: InMemoryBackend, gated: Operation) -> Self {
        Self {
            inner,
            gated,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    async fn hold(&self, op: Operation) {
        if op == self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl LearningBackend for GatedBackend {
    async fn catalog(&self) -> Result<Vec<Module>, BackendError> {
        self.inner.catalog().await
    }

    async fn module_content(&self, id: &ModuleId) -> Result<ModulePatch, BackendError> {
        self.hold(Operation::ModuleContent).await;
        self.inner.module_content(id).await
    }

    async fn progress(&self) -> Result<ProgressMap, BackendError> {
        LearningBackend::progress(&self.inner).await
    }

    async fn stats(&self) -> Result<LearningStats, BackendError> {
        self.inner.stats().await
    }

    async fn update_progress(
        &self,
        module: &ModuleId,
        lesson: &LessonId,
        completed: bool,
    ) -> Result<(), BackendError> {
        self.hold(Operation::UpdateProgress).await;
        self.inner.update_progress(module, lesson, completed).await
    }
}

async fn gated_service(gated: Operation) -> (InMemoryBackend, GatedBackend, LearningService) {
    let inner = InMemoryBackend::new().with_clock(fixed_clock());
    inner.set_catalog(vec![contracts()]);
    let gate = GatedBackend::new(inner.clone(), gated);
    let learning = LearningService::new(fixed_clock(), Arc::new(gate.clone()));
    learning.load().await.unwrap();
    (inner, gate, learning)
}

#[tokio::test]
async fn module_opens_before_its_content_arrives() {
    let (inner, gate, learning) = gated_service(Operation::ModuleContent).await;
    inner.set_module_content(
        contracts_id(),
        ModulePatch {
            description: Some("Formation, performance and breach.".into()),
            ..ModulePatch::default()
        },
    );

    let opening = tokio::spawn({
        let learning = learning.clone();
        async move { learning.select_module(&contracts_id()).await }
    });
    gate.entered.notified().await;

    let state = learning.snapshot();
    assert_eq!(
        state.navigation(),
        &NavigationState::ModuleDetail {
            module: contracts_id()
        }
    );
    assert!(state.is_loading_content());
    let selected = state.selected_module().unwrap();
    assert_eq!(selected.lessons(), contracts().lessons());
    assert_eq!(selected.description(), "");
    assert!(learning.select_lesson(&LessonId::new("A")).moved());

    gate.release.notify_one();
    assert_eq!(opening.await.unwrap(), Transition::Moved);

    let state = learning.snapshot();
    assert!(!state.is_loading_content());
    assert_eq!(
        state.selected_module().map(Module::description),
        Some("Formation, performance and breach.")
    );
    assert_eq!(
        state.navigation(),
        &NavigationState::LessonDetail {
            module: contracts_id(),
            lesson: LessonId::new("A"),
        }
    );
}

#[tokio::test]
async fn second_completion_while_pending_is_busy() {
    let (inner, gated, learning) = gated_service(Operation::UpdateProgress).await;
    learning.select_module(&contracts_id()).await;
    learning.select_lesson(&LessonId::new("A"));

    let first = tokio::spawn({
        let learning = learning.clone();
        async move { learning.complete_lesson().await }
    });
    gated.entered.notified().await;

    assert!(learning.is_completing());
    // Navigation stays responsive while the request is in flight.
    assert!(learning.back().moved());
    let err = learning.complete_lesson().await.unwrap_err();
    assert!(matches!(err, LearningError::Busy));
    assert_eq!(inner.calls(Operation::UpdateProgress), 1);
    assert!(learning.snapshot().progress().is_empty());

    gated.release.notify_one();
    first.await.unwrap().unwrap();

    assert!(!learning.is_completing());
    assert!(
        learning
            .snapshot()
            .progress()
            .is_completed(&contracts_id(), &LessonId::new("A"))
    );
}
