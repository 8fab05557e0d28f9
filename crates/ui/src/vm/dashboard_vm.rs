use services::Dashboard;

use crate::vm::progress_vm::ProgressBarVm;
use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentItemVm {
    pub title: String,
    pub date_str: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub total_lessons: u32,
    pub completed_lessons: u32,
    pub active_modules: u32,
    pub completion: ProgressBarVm,
    pub stats_fallback: bool,
    pub recent_sessions: Vec<RecentItemVm>,
    pub recent_analyses: Vec<RecentItemVm>,
}

impl From<&Dashboard> for DashboardVm {
    fn from(dashboard: &Dashboard) -> Self {
        Self {
            total_lessons: dashboard.stats.total_lessons,
            completed_lessons: dashboard.stats.completed_lessons,
            active_modules: dashboard.stats.active_modules,
            completion: ProgressBarVm::from_rate(dashboard.stats.completion_rate),
            stats_fallback: dashboard.stats_fallback,
            recent_sessions: dashboard
                .recent_sessions
                .iter()
                .map(|session| RecentItemVm {
                    title: session.topic_label().to_owned(),
                    date_str: session.updated_at.map(format_date),
                })
                .collect(),
            recent_analyses: dashboard
                .recent_analyses
                .iter()
                .enumerate()
                .map(|(index, analysis)| RecentItemVm {
                    title: analysis
                        .title
                        .clone()
                        .filter(|t| !t.trim().is_empty())
                        .unwrap_or_else(|| format!("Case Analysis #{}", index + 1)),
                    date_str: analysis.created_at.map(format_date),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legal_core::model::{ChatSession, LearningStats, SavedAnalysis};

    #[test]
    fn fallback_dashboard_renders_placeholders() {
        let dashboard = Dashboard {
            stats: LearningStats::dashboard_fallback(),
            stats_fallback: true,
            recent_sessions: vec![ChatSession::default()],
            recent_analyses: vec![SavedAnalysis::default()],
        };

        let vm = DashboardVm::from(&dashboard);

        assert_eq!(vm.total_lessons, 6);
        assert_eq!(vm.completion.label(), "0%");
        assert!(vm.stats_fallback);
        assert_eq!(vm.recent_sessions[0].title, "General Discussion");
        assert_eq!(vm.recent_analyses[0].title, "Case Analysis #1");
        assert_eq!(vm.recent_analyses[0].date_str, None);
    }
}
