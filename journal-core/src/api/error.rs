//! Structured errors for backend calls.

use serde::Deserialize;
use thiserror::Error;

/// Failure of a single request to the journal backend.
///
/// Displayable in both CLI and TUI contexts. The user-facing text prefers
/// the backend's own `detail` message when one came back.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("network unreachable: {0}")]
    Network(String),

    #[error("backend returned HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// The backend-supplied message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// `detail` when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Pull a FastAPI-style `{"detail": "..."}` message out of an error body.
///
/// Only string details count; validation errors arrive as arrays and are
/// treated as absent.
pub fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}
