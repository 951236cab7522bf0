// Session manager for high-level session operations

use super::cookie::SessionCookie;
use super::error::SessionError;
use super::id;
use super::storage::SessionStorage;
use super::types::{RequestContext, Session, SessionConfig, id_prefix};
use axum::http::{HeaderMap, header::SET_COOKIE};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session manager mediating between request cookies and the session store
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    config: SessionConfig,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(storage: Arc<dyn SessionStorage>, config: SessionConfig) -> Self {
        Self { storage, config }
    }

    /// Default cookie name from configuration
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Issue a fresh session identifier
    pub fn generate_session_id(&self) -> Result<String, SessionError> {
        id::generate_session_id()
    }

    /// Create a new session unless the request already carries a live one.
    ///
    /// Only the incoming cookie is checked against the store; the freshly
    /// generated identifier is trusted to be unique.
    pub async fn new_session(
        &self,
        request: &RequestContext,
        cookie_name: &str,
    ) -> Result<Session, SessionError> {
        if let Some(existing) = request.cookie(cookie_name)
            && self.storage.exists(&existing).await
        {
            warn!(
                "Session {} already issued for cookie '{}'",
                id_prefix(&existing),
                cookie_name
            );
            return Err(SessionError::SessionAlreadyIssued);
        }

        let mut session = Session::new(self.generate_session_id()?, cookie_name);
        session.attach_request(request);

        debug!(
            "Created session {} for {} {}",
            id_prefix(&session.id),
            request.method,
            request.uri
        );

        Ok(session)
    }

    /// Store the session and mirror its identifier in a response cookie.
    /// Any existing entry under the same identifier is replaced.
    pub async fn save_session(
        &self,
        response_headers: &mut HeaderMap,
        session: &Session,
    ) -> Result<(), SessionError> {
        let cookie = SessionCookie::new(session.name(), &session.id);
        let header_value = cookie.to_header_value()?;

        let value = serde_json::to_value(session)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        self.storage.insert(session.id.clone(), value).await;
        response_headers.append(SET_COOKIE, header_value);

        info!(
            "Saved session {} under cookie '{}'",
            id_prefix(&session.id),
            session.name()
        );

        Ok(())
    }

    /// Check whether a session is stored under the identifier
    pub async fn session_exists(&self, session_id: &str) -> bool {
        self.storage.exists(session_id).await
    }

    /// Load the session named by the request cookie and attach the request to it
    pub async fn get_session(
        &self,
        request: &RequestContext,
        cookie_name: &str,
    ) -> Result<Session, SessionError> {
        let session_id = request
            .cookie(cookie_name)
            .ok_or_else(|| SessionError::CookieMissing(cookie_name.to_string()))?;

        let value = self.storage.lookup(&session_id).await.ok_or_else(|| {
            debug!("No session stored for {}", id_prefix(&session_id));
            SessionError::InvalidSessionId
        })?;

        let mut session: Session = serde_json::from_value(value).map_err(|e| {
            warn!(
                "Stored entry {} is not a session: {}",
                id_prefix(&session_id),
                e
            );
            SessionError::CorruptSessionEntry(e.to_string())
        })?;

        session.attach_request(request);
        Ok(session)
    }

    /// Remove a session; unknown identifiers are ignored
    pub async fn destroy_session(&self, session_id: &str) {
        self.storage.remove(session_id).await;
        info!("Session {} destroyed", id_prefix(session_id));
    }

    /// Number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.storage.count().await
    }
}

/// Session manager state for use in Axum handlers
#[derive(Clone)]
pub struct SessionManagerState {
    pub manager: Arc<SessionManager>,
}

impl SessionManagerState {
    pub fn new(storage: Arc<dyn SessionStorage>, config: SessionConfig) -> Self {
        Self {
            manager: Arc::new(SessionManager::new(storage, config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemorySessionStorage;
    use axum::http::{HeaderValue, Method, Uri, header::COOKIE};
    use serde_json::json;

    fn manager() -> (Arc<MemorySessionStorage>, SessionManager) {
        let storage = Arc::new(MemorySessionStorage::new());
        let manager = SessionManager::new(storage.clone(), SessionConfig::default());
        (storage, manager)
    }

    fn request_with_cookie(cookie: Option<&str>) -> RequestContext {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        RequestContext::new(Method::GET, Uri::from_static("/"), headers)
    }

    #[tokio::test]
    async fn test_new_session_without_cookie() {
        let (_, manager) = manager();
        let request = request_with_cookie(None);

        let session = manager.new_session(&request, "sid").await.unwrap();

        assert_eq!(session.id.len(), id::SESSION_ID_LEN);
        assert_eq!(session.name(), "sid");
        assert!(session.request().is_some());
        assert!(!manager.session_exists(&session.id).await);
    }

    #[tokio::test]
    async fn test_new_session_with_unknown_cookie() {
        let (_, manager) = manager();
        let request = request_with_cookie(Some("sid=stale"));

        let session = manager.new_session(&request, "sid").await.unwrap();
        assert_ne!(session.id, "stale");
    }

    #[tokio::test]
    async fn test_new_session_already_issued() {
        let (_, manager) = manager();
        let first = manager
            .new_session(&request_with_cookie(None), "sid")
            .await
            .unwrap();
        let mut response = HeaderMap::new();
        manager.save_session(&mut response, &first).await.unwrap();

        let request = request_with_cookie(Some(&format!("sid={}", first.id)));
        let result = manager.new_session(&request, "sid").await;
        assert_eq!(result.unwrap_err(), SessionError::SessionAlreadyIssued);

        // A different cookie name is not affected
        assert!(manager.new_session(&request, "other").await.is_ok());
    }

    #[tokio::test]
    async fn test_save_sets_cookie_and_stores() {
        let (_, manager) = manager();
        let session = manager
            .new_session(&request_with_cookie(None), "sid")
            .await
            .unwrap();

        let mut response = HeaderMap::new();
        manager.save_session(&mut response, &session).await.unwrap();

        assert!(manager.session_exists(&session.id).await);
        assert_eq!(
            response.get(SET_COOKIE).unwrap().to_str().unwrap(),
            format!("sid={}; Path=/", session.id)
        );
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (_, manager) = manager();
        let mut session = manager
            .new_session(&request_with_cookie(None), "sid")
            .await
            .unwrap();

        let mut response = HeaderMap::new();
        manager.save_session(&mut response, &session).await.unwrap();
        session.set("count", json!(2));
        manager.save_session(&mut response, &session).await.unwrap();

        let request = request_with_cookie(Some(&format!("sid={}", session.id)));
        let loaded = manager.get_session(&request, "sid").await.unwrap();
        assert_eq!(loaded.get("count"), Some(&json!(2)));
        assert_eq!(manager.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_cookie_name() {
        let (_, manager) = manager();
        let session = manager
            .new_session(&request_with_cookie(None), "bad name")
            .await
            .unwrap();

        let mut response = HeaderMap::new();
        let result = manager.save_session(&mut response, &session).await;

        assert_eq!(
            result.unwrap_err(),
            SessionError::InvalidCookieName("bad name".to_string())
        );
        assert!(!manager.session_exists(&session.id).await);
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_get_session_round_trip() {
        let (_, manager) = manager();
        let session = manager
            .new_session(&request_with_cookie(None), "sid")
            .await
            .unwrap();
        let mut response = HeaderMap::new();
        manager.save_session(&mut response, &session).await.unwrap();

        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        let cookie_pair = set_cookie.split(';').next().unwrap();
        let request = request_with_cookie(Some(cookie_pair));

        let loaded = manager.get_session(&request, "sid").await.unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.created_at, session.created_at);
        assert!(loaded.request().is_some());
    }

    #[tokio::test]
    async fn test_get_session_without_cookie() {
        let (_, manager) = manager();

        let result = manager.get_session(&request_with_cookie(None), "sid").await;
        assert_eq!(
            result.unwrap_err(),
            SessionError::CookieMissing("sid".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_session_unknown_id() {
        let (_, manager) = manager();

        let result = manager
            .get_session(&request_with_cookie(Some("sid=unknown")), "sid")
            .await;
        assert_eq!(result.unwrap_err(), SessionError::InvalidSessionId);
    }

    #[tokio::test]
    async fn test_get_session_corrupt_entry() {
        let (storage, manager) = manager();
        storage
            .insert("broken".to_string(), json!("not a session"))
            .await;

        let result = manager
            .get_session(&request_with_cookie(Some("sid=broken")), "sid")
            .await;
        assert!(matches!(
            result,
            Err(SessionError::CorruptSessionEntry(_))
        ));
    }

    #[tokio::test]
    async fn test_destroy_session() {
        let (_, manager) = manager();
        let session = manager
            .new_session(&request_with_cookie(None), "sid")
            .await
            .unwrap();
        let mut response = HeaderMap::new();
        manager.save_session(&mut response, &session).await.unwrap();

        manager.destroy_session(&session.id).await;
        assert!(!manager.session_exists(&session.id).await);

        // Destroying an unknown session is a no-op
        manager.destroy_session("does-not-exist").await;
        assert_eq!(manager.session_count().await, 0);
    }
}
