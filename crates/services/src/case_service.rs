use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use backend::CaseBackend;
use legal_core::model::{AnalysisType, CaseAnalysis, CaseRecord, LegalArea, SavedAnalysis};

use crate::error::CaseError;
use crate::loadable::Loadable;

/// Area id that means "no area filter".
pub const ALL_AREAS: &str = "all";

#[derive(Debug, Clone, Default)]
struct CaseState {
    analysis: Loadable<CaseAnalysis>,
    results: Loadable<Vec<CaseRecord>>,
    selected_area: Option<String>,
}

/// Case analysis and research.
#[derive(Clone)]
pub struct CaseService {
    backend: Arc<dyn CaseBackend>,
    state: Arc<Mutex<CaseState>>,
}

impl CaseService {
    #[must_use]
    pub fn new(backend: Arc<dyn CaseBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(CaseState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, CaseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Analyze pasted case text with the chosen method.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::EmptyText` for blank text, before any request, and
    /// `CaseError::Backend` if the analysis fails.
    #[tracing::instrument(level = "debug", skip(self, case_text))]
    pub async fn analyze(
        &self,
        case_text: &str,
        analysis_type: AnalysisType,
    ) -> Result<CaseAnalysis, CaseError> {
        if case_text.trim().is_empty() {
            return Err(CaseError::EmptyText);
        }
        self.state().analysis = Loadable::Loading;

        match self.backend.analyze(case_text, analysis_type).await {
            Ok(analysis) => {
                self.state().analysis = Loadable::Ready(analysis.clone());
                Ok(analysis)
            }
            Err(err) => {
                tracing::warn!(error = %err, "case analysis failed");
                self.state().analysis = Loadable::Failed(err.user_message());
                Err(err.into())
            }
        }
    }

    /// Search cases. A blank query yields no results and no request.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::Backend` if the search fails; results are left empty.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<CaseRecord>, CaseError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.state().results.begin();
        let result = self.backend.search(query).await;
        self.store_results(result)
    }

    /// Browse cases by area of law. [`ALL_AREAS`] clears the results without a request.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::Backend` if the request fails; results are left empty.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn by_area(&self, area: &str) -> Result<Vec<CaseRecord>, CaseError> {
        {
            let mut state = self.state();
            if area == ALL_AREAS {
                state.selected_area = None;
                state.results = Loadable::Idle;
                return Ok(Vec::new());
            }
            state.selected_area = Some(area.to_owned());
            state.results.begin();
        }
        let result = self.backend.by_area(area).await;
        self.store_results(result)
    }

    fn store_results(
        &self,
        result: Result<Vec<CaseRecord>, backend::BackendError>,
    ) -> Result<Vec<CaseRecord>, CaseError> {
        let mut state = self.state();
        match result {
            Ok(cases) => {
                state.results = Loadable::Ready(cases.clone());
                Ok(cases)
            }
            Err(err) => {
                tracing::warn!(error = %err, "case lookup failed");
                state.results = Loadable::Failed(err.user_message());
                Err(err.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `CaseError::Backend` if the request fails.
    pub async fn legal_areas(&self) -> Result<Vec<LegalArea>, CaseError> {
        Ok(self.backend.legal_areas().await?)
    }

    /// # Errors
    ///
    /// Returns `CaseError::Backend` if the request fails.
    pub async fn user_analyses(&self) -> Result<Vec<SavedAnalysis>, CaseError> {
        Ok(self.backend.user_analyses().await?)
    }

    #[must_use]
    pub fn analysis(&self) -> Loadable<CaseAnalysis> {
        self.state().analysis.clone()
    }

    /// Current search or browse results; empty unless a lookup succeeded.
    #[must_use]
    pub fn results(&self) -> Vec<CaseRecord> {
        self.state().results.value_or_default()
    }

    #[must_use]
    pub fn results_error(&self) -> Option<String> {
        self.state().results.error().map(str::to_owned)
    }

    #[must_use]
    pub fn selected_area(&self) -> String {
        self.state()
            .selected_area
            .clone()
            .unwrap_or_else(|| ALL_AREAS.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{InMemoryBackend, Operation};

    fn seeded() -> (InMemoryBackend, CaseService) {
        let backend = InMemoryBackend::new();
        backend.set_cases(vec![
            CaseRecord {
                title: "Hadley v Baxendale".into(),
                area_of_law: Some("contract_law".into()),
                ..CaseRecord::default()
            },
            CaseRecord {
                title: "Donoghue v Stevenson".into(),
                area_of_law: Some("tort_law".into()),
                ..CaseRecord::default()
            },
        ]);
        let service = CaseService::new(Arc::new(backend.clone()));
        (backend, service)
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_request() {
        let (backend, cases) = seeded();
        let err = cases.analyze("  \n", AnalysisType::Irac).await.unwrap_err();
        assert!(matches!(err, CaseError::EmptyText));
        assert_eq!(backend.calls(Operation::Analyze), 0);
        assert_eq!(cases.analysis(), Loadable::Idle);
    }

    #[tokio::test]
    async fn analysis_result_is_kept() {
        let (_, cases) = seeded();
        let analysis = cases
            .analyze("The defendant promised...", AnalysisType::Brief)
            .await
            .unwrap();
        assert_eq!(analysis.analysis_type(), AnalysisType::Brief);
        assert!(cases.analysis().ready().is_some());
    }

    #[tokio::test]
    async fn blank_search_is_empty_without_request() {
        let (backend, cases) = seeded();
        assert!(cases.search(" ").await.unwrap().is_empty());
        assert_eq!(backend.calls(Operation::SearchCases), 0);
    }

    #[tokio::test]
    async fn failed_search_leaves_results_empty() {
        let (backend, cases) = seeded();
        assert_eq!(cases.search("hadley").await.unwrap().len(), 1);

        backend.fail(Operation::SearchCases, "index rebuilding");
        assert!(cases.search("donoghue").await.is_err());
        assert!(cases.results().is_empty());
        assert_eq!(cases.results_error().as_deref(), Some("index rebuilding"));
    }

    #[tokio::test]
    async fn all_areas_clears_results_without_request() {
        let (backend, cases) = seeded();
        assert_eq!(cases.by_area("tort_law").await.unwrap().len(), 1);
        assert_eq!(cases.selected_area(), "tort_law");

        assert!(cases.by_area(ALL_AREAS).await.unwrap().is_empty());
        assert!(cases.results().is_empty());
        assert_eq!(cases.selected_area(), ALL_AREAS);
        assert_eq!(backend.calls(Operation::CasesByArea), 1);
    }
}
