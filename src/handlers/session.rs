use crate::session::{RequestContext, SessionError, SessionManagerState, read_cookie};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::{info, warn};

type SessionResponse = (StatusCode, HeaderMap, Json<Value>);

/// Start a session for a client that does not have one yet
pub async fn create_session(
    State(state): State<SessionManagerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<SessionResponse, SessionError> {
    let manager = &state.manager;
    let request = RequestContext::new(method, uri, headers);

    let session = manager
        .new_session(&request, manager.cookie_name())
        .await
        .inspect_err(|e| warn!("Session creation rejected: {}", e))?;

    let mut response_headers = HeaderMap::new();
    manager
        .save_session(&mut response_headers, &session)
        .await?;

    Ok((
        StatusCode::CREATED,
        response_headers,
        Json(json!({ "session_id": session.id })),
    ))
}

/// Return the session named by the request cookie
pub async fn get_session(
    State(state): State<SessionManagerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<Value>, SessionError> {
    let manager = &state.manager;
    let request = RequestContext::new(method, uri, headers);

    let session = manager
        .get_session(&request, manager.cookie_name())
        .await?;

    Ok(Json(json!(session.to_info())))
}

/// Merge a JSON object into the session payload and store it again
pub async fn update_session_values(
    State(state): State<SessionManagerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(payload): Json<HashMap<String, Value>>,
) -> Result<SessionResponse, SessionError> {
    let manager = &state.manager;
    let request = RequestContext::new(method, uri, headers);

    let mut session = manager
        .get_session(&request, manager.cookie_name())
        .await?;

    for (key, value) in payload {
        session.set(key, value);
    }

    let mut response_headers = HeaderMap::new();
    manager
        .save_session(&mut response_headers, &session)
        .await?;

    Ok((
        StatusCode::OK,
        response_headers,
        Json(json!(session.to_info())),
    ))
}

/// Destroy the session named by the request cookie
pub async fn destroy_session(
    State(state): State<SessionManagerState>,
    headers: HeaderMap,
) -> Result<StatusCode, SessionError> {
    let manager = &state.manager;
    let cookie_name = manager.cookie_name();

    let session_id = read_cookie(&headers, cookie_name)
        .ok_or_else(|| SessionError::CookieMissing(cookie_name.to_string()))?;

    manager.destroy_session(&session_id).await;
    info!("Logout completed for cookie '{}'", cookie_name);

    Ok(StatusCode::NO_CONTENT)
}
