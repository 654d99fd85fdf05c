// ABOUTME: Error type for calls against the Homescreen Hero backend
// Separates transport failures from non-2xx responses so steps can surface the body verbatim

use thiserror::Error;

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, TLS)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The endpoint URL could not be built from the configured base
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Build a status error from a response code and its text body
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Message shown inline on the step that issued the call.
    ///
    /// Status errors show the response body exactly as the backend sent it.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { status, body } if body.trim().is_empty() => format!("HTTP {status}"),
            Self::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
