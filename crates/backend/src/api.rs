use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use legal_core::model::{
    AnalysisType, CaseAnalysis, CaseRecord, ChatReply, ChatSession, ChatTopic, LearningStats,
    LegalArea, LessonId, Module, ModuleId, ModulePatch, ProgressMap, SavedAnalysis,
};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::http::HttpBackend;
use crate::memory::InMemoryBackend;

/// Learning endpoints: catalog, module detail, progress and stats.
#[async_trait]
pub trait LearningBackend: Send + Sync {
    /// Fetch the module catalog in backend order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body cannot be decoded.
    async fn catalog(&self) -> Result<Vec<Module>, BackendError>;

    /// Fetch the detail view of one module (lesson bodies included).
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` or `BackendError::Api` for unknown modules.
    async fn module_content(&self, id: &ModuleId) -> Result<ModulePatch, BackendError>;

    /// Fetch the current user's progress records.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn progress(&self) -> Result<ProgressMap, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn stats(&self) -> Result<LearningStats, BackendError>;

    /// Record a lesson as completed (or not).
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the update.
    async fn update_progress(
        &self,
        module: &ModuleId,
        lesson: &LessonId,
        completed: bool,
    ) -> Result<(), BackendError>;
}

/// AI tutor endpoints.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn send_message(
        &self,
        message: &str,
        topic: Option<&str>,
    ) -> Result<ChatReply, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn topics(&self) -> Result<Vec<ChatTopic>, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn sessions(&self) -> Result<Vec<ChatSession>, BackendError>;
}

/// Case analysis and research endpoints.
#[async_trait]
pub trait CaseBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn analyze(
        &self,
        case_text: &str,
        analysis_type: AnalysisType,
    ) -> Result<CaseAnalysis, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn search(&self, query: &str) -> Result<Vec<CaseRecord>, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn by_area(&self, area: &str) -> Result<Vec<CaseRecord>, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn legal_areas(&self) -> Result<Vec<LegalArea>, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn user_analyses(&self) -> Result<Vec<SavedAnalysis>, BackendError>;
}

//
// ─── GENERIC SEARCH ────────────────────────────────────────────────────────────
//

/// Scope of a site-wide search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    All,
    Cases,
    Modules,
}

impl SearchKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Cases => "cases",
            Self::Modules => "modules",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown search kind: {0}")]
pub struct UnknownSearchKind(pub String);

impl FromStr for SearchKind {
    type Err = UnknownSearchKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "cases" => Ok(Self::Cases),
            "modules" => Ok(Self::Modules),
            _ => Err(UnknownSearchKind(s.to_owned())),
        }
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Site-wide search. Results are returned as raw JSON objects.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
    ) -> Result<Vec<serde_json::Value>, BackendError>;
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates the backend traits behind trait objects so adapters can be swapped.
#[derive(Clone)]
pub struct Backend {
    pub learning: Arc<dyn LearningBackend>,
    pub chat: Arc<dyn ChatBackend>,
    pub cases: Arc<dyn CaseBackend>,
    pub search: Arc<dyn SearchBackend>,
}

impl Backend {
    /// Every trait served by one shared in-memory adapter.
    #[must_use]
    pub fn in_memory(backend: InMemoryBackend) -> Self {
        Self {
            learning: Arc::new(backend.clone()),
            chat: Arc::new(backend.clone()),
            cases: Arc::new(backend.clone()),
            search: Arc::new(backend),
        }
    }

    /// Every trait served by the HTTP adapter.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn http(config: BackendConfig) -> Result<Self, BackendError> {
        let http = HttpBackend::new(config)?;
        Ok(Self {
            learning: Arc::new(http.clone()),
            chat: Arc::new(http.clone()),
            cases: Arc::new(http.clone()),
            search: Arc::new(http),
        })
    }
}
