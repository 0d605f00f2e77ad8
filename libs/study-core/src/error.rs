//! Error types for study-core.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a word source.
///
/// Always recoverable: the session shows it as an error state and can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Not authenticated - check the auth token")]
    Unauthorized,
}

/// Errors raised while driving a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot apply {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("session already dismissed")]
    Disposed,
}
