//! Shared error types for the services crate.

use backend::BackendError;
use legal_core::model::ModuleError;
use thiserror::Error;

/// Errors emitted by `LearningService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LearningError {
    #[error("a lesson completion is already in progress")]
    Busy,
    #[error("no lesson is selected")]
    NotInLesson,
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted by `ChatService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("a message is already being sent")]
    Busy,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted by `CaseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaseError {
    #[error("case text cannot be empty")]
    EmptyText,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl LearningError {
    /// Text suitable for an error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl ChatError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl CaseError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
