#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;

pub use api::{
    Backend, CaseBackend, ChatBackend, LearningBackend, SearchBackend, SearchKind,
    UnknownSearchKind,
};
pub use config::{BackendConfig, ConfigError};
pub use error::{BackendError, FALLBACK_ERROR_MESSAGE};
pub use http::HttpBackend;
pub use memory::{InMemoryBackend, Operation};
