//! In-memory backend for tests and offline demos.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use legal_core::completion_percentage;
use legal_core::model::{
    AnalysisType, CaseAnalysis, CaseRecord, ChatReply, ChatSession, ChatTopic, IracAnalysis,
    LearningStats, LegalArea, LessonId, Module, ModuleId, ModulePatch, ProgressMap,
    ProgressRecord, SavedAnalysis,
};
use legal_core::time::Clock;
use serde_json::{Map, Value, json};

use crate::api::{CaseBackend, ChatBackend, LearningBackend, SearchBackend, SearchKind};
use crate::error::BackendError;

/// Every backend call, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Catalog,
    ModuleContent,
    Progress,
    Stats,
    UpdateProgress,
    SendMessage,
    Topics,
    Sessions,
    Analyze,
    SearchCases,
    CasesByArea,
    LegalAreas,
    UserAnalyses,
    Search,
}

#[derive(Default)]
struct State {
    catalog: Vec<Module>,
    module_content: HashMap<ModuleId, ModulePatch>,
    progress: ProgressMap,
    stats: Option<LearningStats>,
    topics: Vec<ChatTopic>,
    sessions: Vec<ChatSession>,
    chat_reply: Option<ChatReply>,
    analysis: Option<CaseAnalysis>,
    cases: Vec<CaseRecord>,
    areas: Vec<LegalArea>,
    analyses: Vec<SavedAnalysis>,
    failures: HashMap<Operation, String>,
    calls: HashMap<Operation, usize>,
}

/// Shared in-memory backend. Clones see the same state.
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
    clock: Clock,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            clock: Clock::default(),
        }
    }

    /// Stamp accepted completions with this clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, BackendError> {
        self.state
            .lock()
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }

    /// Count the call and return the injected failure, if any.
    fn enter(&self, op: Operation) -> Result<MutexGuard<'_, State>, BackendError> {
        let mut guard = self.lock()?;
        *guard.calls.entry(op).or_default() += 1;
        if let Some(detail) = guard.failures.get(&op) {
            return Err(BackendError::Unavailable(detail.clone()));
        }
        Ok(guard)
    }

    // ─── Seeding ──────────────────────────────────────────────────────────────

    fn seed(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_catalog(&self, catalog: Vec<Module>) {
        self.seed().catalog = catalog;
    }

    /// Detail payload served for one module.
    pub fn set_module_content(&self, id: ModuleId, patch: ModulePatch) {
        self.seed().module_content.insert(id, patch);
    }

    pub fn set_progress(&self, progress: ProgressMap) {
        self.seed().progress = progress;
    }

    /// Fixed stats. Without them stats are derived from catalog and progress.
    pub fn set_stats(&self, stats: LearningStats) {
        self.seed().stats = Some(stats);
    }

    pub fn set_topics(&self, topics: Vec<ChatTopic>) {
        self.seed().topics = topics;
    }

    pub fn set_sessions(&self, sessions: Vec<ChatSession>) {
        self.seed().sessions = sessions;
    }

    /// Reply returned by every chat message. Without one, the message is echoed.
    pub fn set_chat_reply(&self, reply: ChatReply) {
        self.seed().chat_reply = Some(reply);
    }

    pub fn set_analysis(&self, analysis: CaseAnalysis) {
        self.seed().analysis = Some(analysis);
    }

    pub fn set_cases(&self, cases: Vec<CaseRecord>) {
        self.seed().cases = cases;
    }

    pub fn set_areas(&self, areas: Vec<LegalArea>) {
        self.seed().areas = areas;
    }

    pub fn set_analyses(&self, analyses: Vec<SavedAnalysis>) {
        self.seed().analyses = analyses;
    }

    // ─── Failure injection ────────────────────────────────────────────────────

    /// Make `op` fail with `BackendError::Unavailable(detail)` until [`Self::recover`].
    pub fn fail(&self, op: Operation, detail: impl Into<String>) {
        self.seed().failures.insert(op, detail.into());
    }

    pub fn recover(&self, op: Operation) {
        self.seed().failures.remove(&op);
    }

    /// Number of times `op` was called, failed calls included.
    #[must_use]
    pub fn calls(&self, op: Operation) -> usize {
        self.seed().calls.get(&op).copied().unwrap_or(0)
    }

    /// Snapshot of stored progress.
    #[must_use]
    pub fn stored_progress(&self) -> ProgressMap {
        self.seed().progress.clone()
    }
}

fn derived_stats(catalog: &[Module], progress: &ProgressMap) -> LearningStats {
    let total: usize = catalog.iter().map(|m| m.lessons().len()).sum();
    let completed: usize = catalog
        .iter()
        .map(|m| {
            m.lessons()
                .iter()
                .filter(|l| progress.is_completed(m.id(), l.id()))
                .count()
        })
        .sum();
    let active = catalog
        .iter()
        .filter(|m| progress.completed_count(m.id()) > 0)
        .count();
    let to_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    LearningStats {
        total_lessons: to_u32(total),
        completed_lessons: to_u32(completed),
        completion_rate: f64::from(completion_percentage(total, completed)),
        active_modules: to_u32(active),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl LearningBackend for InMemoryBackend {
    async fn catalog(&self) -> Result<Vec<Module>, BackendError> {
        Ok(self.enter(Operation::Catalog)?.catalog.clone())
    }

    async fn module_content(&self, id: &ModuleId) -> Result<ModulePatch, BackendError> {
        let guard = self.enter(Operation::ModuleContent)?;
        if let Some(patch) = guard.module_content.get(id) {
            return Ok(patch.clone());
        }
        guard
            .catalog
            .iter()
            .find(|m| m.id() == id)
            .map(|m| ModulePatch {
                lessons: Some(m.lessons().to_vec()),
                ..ModulePatch::default()
            })
            .ok_or(BackendError::NotFound)
    }

    async fn progress(&self) -> Result<ProgressMap, BackendError> {
        Ok(self.enter(Operation::Progress)?.progress.clone())
    }

    async fn stats(&self) -> Result<LearningStats, BackendError> {
        let guard = self.enter(Operation::Stats)?;
        Ok(guard
            .stats
            .unwrap_or_else(|| derived_stats(&guard.catalog, &guard.progress)))
    }

    async fn update_progress(
        &self,
        module: &ModuleId,
        lesson: &LessonId,
        completed: bool,
    ) -> Result<(), BackendError> {
        let mut guard = self.enter(Operation::UpdateProgress)?;
        let record = if completed {
            ProgressRecord::completed_at(self.clock.now())
        } else {
            ProgressRecord::incomplete()
        };
        guard.progress.insert(module.clone(), lesson.clone(), record);
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for InMemoryBackend {
    async fn send_message(
        &self,
        message: &str,
        topic: Option<&str>,
    ) -> Result<ChatReply, BackendError> {
        let guard = self.enter(Operation::SendMessage)?;
        Ok(guard.chat_reply.clone().unwrap_or_else(|| ChatReply {
            response: format!("You asked: {message}"),
            sources: Vec::new(),
            topic: topic.map(str::to_owned),
        }))
    }

    async fn topics(&self) -> Result<Vec<ChatTopic>, BackendError> {
        Ok(self.enter(Operation::Topics)?.topics.clone())
    }

    async fn sessions(&self) -> Result<Vec<ChatSession>, BackendError> {
        Ok(self.enter(Operation::Sessions)?.sessions.clone())
    }
}

#[async_trait]
impl CaseBackend for InMemoryBackend {
    async fn analyze(
        &self,
        case_text: &str,
        analysis_type: AnalysisType,
    ) -> Result<CaseAnalysis, BackendError> {
        let guard = self.enter(Operation::Analyze)?;
        if let Some(analysis) = &guard.analysis {
            return Ok(analysis.clone());
        }
        Ok(match analysis_type {
            AnalysisType::Irac => CaseAnalysis::Irac(IracAnalysis {
                issue: case_text.trim().to_owned(),
                ..IracAnalysis::default()
            }),
            other => {
                let mut fields = Map::new();
                fields.insert("summary".into(), Value::String(case_text.trim().to_owned()));
                CaseAnalysis::Fields {
                    analysis_type: other,
                    fields,
                }
            }
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<CaseRecord>, BackendError> {
        let guard = self.enter(Operation::SearchCases)?;
        Ok(guard
            .cases
            .iter()
            .filter(|c| contains_ci(&c.title, query) || contains_ci(&c.summary, query))
            .cloned()
            .collect())
    }

    async fn by_area(&self, area: &str) -> Result<Vec<CaseRecord>, BackendError> {
        let guard = self.enter(Operation::CasesByArea)?;
        Ok(guard
            .cases
            .iter()
            .filter(|c| c.area_of_law.as_deref() == Some(area))
            .cloned()
            .collect())
    }

    async fn legal_areas(&self) -> Result<Vec<LegalArea>, BackendError> {
        Ok(self.enter(Operation::LegalAreas)?.areas.clone())
    }

    async fn user_analyses(&self) -> Result<Vec<SavedAnalysis>, BackendError> {
        Ok(self.enter(Operation::UserAnalyses)?.analyses.clone())
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<Value>, BackendError> {
        let guard = self.enter(Operation::Search)?;
        let mut results = Vec::new();
        if matches!(kind, SearchKind::All | SearchKind::Modules) {
            results.extend(
                guard
                    .catalog
                    .iter()
                    .filter(|m| contains_ci(m.title(), query))
                    .map(|m| json!({"type": "module", "id": m.id().as_str(), "title": m.title()})),
            );
        }
        if matches!(kind, SearchKind::All | SearchKind::Cases) {
            results.extend(
                guard
                    .cases
                    .iter()
                    .filter(|c| contains_ci(&c.title, query))
                    .map(|c| json!({"type": "case", "id": c.id, "title": c.title})),
            );
        }
        Ok(results)
    }
}
