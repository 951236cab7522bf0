pub mod health;
pub mod session;

use crate::session::SessionManagerState;
use axum::{
    Router,
    routing::{get, put},
};

/// Build the application routes
pub fn router(state: SessionManagerState) -> Router {
    Router::new()
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/session",
            get(session::get_session)
                .post(session::create_session)
                .delete(session::destroy_session),
        )
        .route("/api/v1/session/values", put(session::update_session_values))
        .with_state(state)
}
