use std::sync::Arc;

use backend::{Backend, BackendConfig, InMemoryBackend};

use crate::Clock;
use crate::case_service::CaseService;
use crate::chat_service::ChatService;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::learning::LearningService;
use crate::search_service::SearchService;

/// Assembles app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    learning: Arc<LearningService>,
    chat: Arc<ChatService>,
    cases: Arc<CaseService>,
    dashboard: Arc<DashboardService>,
    search: Arc<SearchService>,
}

impl AppServices {
    #[must_use]
    pub fn new(backend: &Backend, clock: Clock) -> Self {
        Self {
            learning: Arc::new(LearningService::new(clock, Arc::clone(&backend.learning))),
            chat: Arc::new(ChatService::new(clock, Arc::clone(&backend.chat))),
            cases: Arc::new(CaseService::new(Arc::clone(&backend.cases))),
            dashboard: Arc::new(DashboardService::new(
                Arc::clone(&backend.learning),
                Arc::clone(&backend.chat),
                Arc::clone(&backend.cases),
            )),
            search: Arc::new(SearchService::new(Arc::clone(&backend.search))),
        }
    }

    /// Build services against the REST API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn http(config: BackendConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let backend = Backend::http(config)?;
        Ok(Self::new(&backend, clock))
    }

    #[must_use]
    pub fn in_memory(backend: InMemoryBackend, clock: Clock) -> Self {
        Self::new(&Backend::in_memory(backend), clock)
    }

    #[must_use]
    pub fn learning(&self) -> Arc<LearningService> {
        Arc::clone(&self.learning)
    }

    #[must_use]
    pub fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }

    #[must_use]
    pub fn cases(&self) -> Arc<CaseService> {
        Arc::clone(&self.cases)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn search(&self) -> Arc<SearchService> {
        Arc::clone(&self.search)
    }
}
