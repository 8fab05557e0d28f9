use std::sync::Arc;

use backend::{CaseBackend, ChatBackend, LearningBackend};
use legal_core::model::{ChatSession, LearningStats, SavedAnalysis};

/// Recent sessions and analyses shown on the dashboard.
pub const DASHBOARD_RECENT_LIMIT: usize = 3;

/// Everything the dashboard renders. Each part falls back on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub stats: LearningStats,
    /// True when `stats` is the placeholder rather than backend data.
    pub stats_fallback: bool,
    pub recent_sessions: Vec<ChatSession>,
    pub recent_analyses: Vec<SavedAnalysis>,
}

#[derive(Clone)]
pub struct DashboardService {
    learning: Arc<dyn LearningBackend>,
    chat: Arc<dyn ChatBackend>,
    cases: Arc<dyn CaseBackend>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        learning: Arc<dyn LearningBackend>,
        chat: Arc<dyn ChatBackend>,
        cases: Arc<dyn CaseBackend>,
    ) -> Self {
        Self {
            learning,
            chat,
            cases,
        }
    }

    /// Fetch stats, sessions and analyses concurrently. Never fails.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load(&self) -> Dashboard {
        let (stats, sessions, analyses) = tokio::join!(
            self.learning.stats(),
            self.chat.sessions(),
            self.cases.user_analyses()
        );

        let (stats, stats_fallback) = match stats {
            Ok(stats) => (stats, false),
            Err(err) => {
                tracing::warn!(error = %err, "learning stats failed");
                (LearningStats::dashboard_fallback(), true)
            }
        };
        let mut recent_sessions = sessions.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "chat sessions failed");
            Vec::new()
        });
        recent_sessions.truncate(DASHBOARD_RECENT_LIMIT);
        let mut recent_analyses = analyses.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "user analyses failed");
            Vec::new()
        });
        recent_analyses.truncate(DASHBOARD_RECENT_LIMIT);

        Dashboard {
            stats,
            stats_fallback,
            recent_sessions,
            recent_analyses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{InMemoryBackend, Operation};

    fn service(backend: &InMemoryBackend) -> DashboardService {
        DashboardService::new(
            Arc::new(backend.clone()),
            Arc::new(backend.clone()),
            Arc::new(backend.clone()),
        )
    }

    #[tokio::test]
    async fn recent_lists_are_capped() {
        let backend = InMemoryBackend::new();
        backend.set_sessions(vec![ChatSession::default(); 5]);
        backend.set_analyses(vec![SavedAnalysis::default(); 4]);

        let dashboard = service(&backend).load().await;

        assert_eq!(dashboard.recent_sessions.len(), 3);
        assert_eq!(dashboard.recent_analyses.len(), 3);
        assert!(!dashboard.stats_fallback);
    }

    #[tokio::test]
    async fn each_part_falls_back_independently() {
        let backend = InMemoryBackend::new();
        backend.set_sessions(vec![ChatSession::default()]);
        backend.fail(Operation::Stats, "stats offline");
        backend.fail(Operation::UserAnalyses, "analyses offline");

        let dashboard = service(&backend).load().await;

        assert!(dashboard.stats_fallback);
        assert_eq!(dashboard.stats, LearningStats::dashboard_fallback());
        assert_eq!(dashboard.stats.total_lessons, 6);
        assert_eq!(dashboard.recent_sessions.len(), 1);
        assert!(dashboard.recent_analyses.is_empty());
    }
}
