use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Shown when a failure carries no usable message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("backend returned {status}")]
    Api {
        status: StatusCode,
        detail: Option<String>,
        message: Option<String>,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("not found")]
    NotFound,

    #[error("base url cannot carry a path")]
    InvalidBaseUrl,

    /// Backend unreachable or refusing work (used by in-memory adapters).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Build an `Api` error from a failed response body.
    ///
    /// Bodies that are not JSON, or JSON without `detail`/`message`, still
    /// produce an error; they just carry no text.
    #[must_use]
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        Self::Api {
            status,
            detail: parsed.detail.and_then(DetailField::into_text),
            message: parsed.message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// The single user-facing message for this failure.
    ///
    /// Prefers a structured `detail`, then a generic `message`, then
    /// [`FALLBACK_ERROR_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        let text = match self {
            Self::Api {
                detail: Some(detail),
                ..
            } => Some(detail.clone()),
            Self::Api {
                message: Some(message),
                ..
            } => Some(message.clone()),
            Self::Api { .. } => None,
            Self::Http(err) => Some(err.to_string()),
            Self::Decode(message) | Self::Unavailable(message) => Some(message.clone()),
            Self::NotFound | Self::InvalidBaseUrl => Some(self.to_string()),
        };
        text.filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_owned())
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<DetailField>,
    #[serde(default)]
    message: Option<String>,
}

/// `detail` is a string for handled errors and a list of validation issues
/// for rejected request bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetailField {
    Text(String),
    Issues(Vec<DetailIssue>),
}

#[derive(Debug, Deserialize)]
struct DetailIssue {
    #[serde(default)]
    msg: Option<String>,
}

impl DetailField {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text).filter(|t| !t.trim().is_empty()),
            Self::Issues(issues) => {
                let joined = issues
                    .into_iter()
                    .filter_map(|issue| issue.msg)
                    .collect::<Vec<_>>()
                    .join("; ");
                Some(joined).filter(|t| !t.is_empty())
            }
        }
    }
}
