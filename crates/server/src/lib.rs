//! Support Agent Server
//!
//! HTTP boundary for session management and chat.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_chat_latency, record_error, record_request};
pub use state::AppState;

use thiserror::Error;

/// Client-visible request errors
///
/// The display string is the exact error payload text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerError {
    /// Chat against a missing or absent session name
    #[error("Invalid session.")]
    InvalidSession,

    /// Turn lookup for a session that does not exist
    #[error("Invalid session.")]
    UnknownSession,

    #[error("Session name is required.")]
    MissingSessionName,

    #[error("Message is required.")]
    MissingMessage,
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::UnknownSession => axum::http::StatusCode::NOT_FOUND,
            ServerError::InvalidSession
            | ServerError::MissingSessionName
            | ServerError::MissingMessage => axum::http::StatusCode::BAD_REQUEST,
        }
    }
}
