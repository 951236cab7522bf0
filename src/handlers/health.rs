use crate::session::SessionManagerState;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

pub async fn health_check(State(state): State<SessionManagerState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "pmp-session-api",
            "version": env!("CARGO_PKG_VERSION"),
            "active_sessions": state.manager.session_count().await
        })),
    )
}
