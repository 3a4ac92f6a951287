//! Error types for backend calls.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single backend request.
///
/// Network failures, non-2xx statuses and unreadable bodies are all
/// reported through this one type so callers can treat them uniformly.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {status}")]
    Status { status: StatusCode, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("login response did not include a token")]
    MissingToken,

    #[error("invalid attachment: {0}")]
    Attachment(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Timeout(_) => true,
            ApiError::Http(err) => err.is_timeout(),
            _ => false,
        }
    }
}
