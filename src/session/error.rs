// Session errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors returned by session manager operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The OS random source could not fill the identifier buffer
    RandomnessFailure(String),
    /// The request already carries a cookie naming a live session
    SessionAlreadyIssued,
    /// The named cookie is absent from the request
    CookieMissing(String),
    /// The cookie names a session that is not in the store
    InvalidSessionId,
    /// A store entry exists but does not decode as a session
    CorruptSessionEntry(String),
    /// The cookie name is not a valid HTTP token
    InvalidCookieName(String),
    /// The session could not be encoded for storage or for the response
    Serialization(String),
}

impl SessionError {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            SessionError::SessionAlreadyIssued => StatusCode::CONFLICT,
            SessionError::CookieMissing(_) | SessionError::InvalidSessionId => {
                StatusCode::UNAUTHORIZED
            }
            SessionError::RandomnessFailure(_)
            | SessionError::CorruptSessionEntry(_)
            | SessionError::InvalidCookieName(_)
            | SessionError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::RandomnessFailure(msg) => {
                write!(f, "Failed to generate session ID: {}", msg)
            }
            SessionError::SessionAlreadyIssued => write!(f, "Session ID has already been issued"),
            SessionError::CookieMissing(name) => write!(f, "Cookie '{}' not present", name),
            SessionError::InvalidSessionId => write!(f, "Invalid session ID"),
            SessionError::CorruptSessionEntry(msg) => write!(f, "Corrupt session entry: {}", msg),
            SessionError::InvalidCookieName(name) => write!(f, "Invalid cookie name '{}'", name),
            SessionError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = self.to_status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
