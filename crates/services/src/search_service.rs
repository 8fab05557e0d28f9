use std::sync::Arc;

use backend::{BackendError, SearchBackend, SearchKind};
use serde_json::Value;

/// Site-wide search over cases and modules.
#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
}

impl SearchService {
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Raw result objects. A blank query returns nothing without a request.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<Value>, BackendError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.backend.search(query, kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{InMemoryBackend, Operation};

    #[tokio::test]
    async fn blank_query_skips_request() {
        let backend = InMemoryBackend::new();
        let search = SearchService::new(Arc::new(backend.clone()));
        assert!(search.search("", SearchKind::All).await.unwrap().is_empty());
        assert_eq!(backend.calls(Operation::Search), 0);
    }
}
