//! Learning progress and navigation: the state object and the service that owns it.

mod service;
mod state;

pub use service::LearningService;
pub use state::LearningState;
