#![forbid(unsafe_code)]

pub mod app_services;
pub mod case_service;
pub mod chat_service;
pub mod dashboard_service;
pub mod error;
pub mod learning;
pub mod loadable;
pub mod search_service;

pub use legal_core::Clock;

pub use app_services::AppServices;
pub use case_service::{ALL_AREAS, CaseService};
pub use chat_service::ChatService;
pub use dashboard_service::{DASHBOARD_RECENT_LIMIT, Dashboard, DashboardService};
pub use error::{AppServicesError, CaseError, ChatError, LearningError};
pub use learning::{LearningService, LearningState};
pub use loadable::Loadable;
pub use search_service::SearchService;
