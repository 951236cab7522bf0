// Session types and data structures

use super::cookie;
use axum::http::{HeaderMap, Method, Uri};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Default name of the cookie carrying the session identifier
pub const DEFAULT_COOKIE_NAME: &str = "sid";

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie name used when handlers do not pick one explicitly
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
        }
    }
}

/// The in-flight request a session is attached to while it is being handled
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
        }
    }

    /// Value of the named request cookie, if present
    pub fn cookie(&self, name: &str) -> Option<String> {
        cookie::read_cookie(&self.headers, name)
    }
}

/// Server-side session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier, mirrored in the client cookie
    pub id: String,
    /// Name of the cookie holding the identifier client-side
    cookie_name: String,
    /// Opaque session payload
    #[serde(default)]
    pub values: HashMap<String, Value>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Request currently being served; never stored
    #[serde(skip)]
    request: Option<RequestContext>,
}

/// Session information for display
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub cookie_name: String,
    pub created_at: DateTime<Utc>,
    pub values: HashMap<String, Value>,
}

impl Session {
    /// Create a session with the given identifier and cookie name
    pub fn new(id: String, cookie_name: &str) -> Self {
        Self {
            id,
            cookie_name: cookie_name.to_string(),
            values: HashMap::new(),
            created_at: Utc::now(),
            request: None,
        }
    }

    /// Cookie name under which the identifier is stored client-side
    pub fn name(&self) -> &str {
        &self.cookie_name
    }

    pub fn request(&self) -> Option<&RequestContext> {
        self.request.as_ref()
    }

    pub(crate) fn attach_request(&mut self, request: &RequestContext) {
        self.request = Some(request.clone());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn to_info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id.clone(),
            cookie_name: self.cookie_name.clone(),
            created_at: self.created_at,
            values: self.values.clone(),
        }
    }
}

/// Shortened identifier for log lines
pub(crate) fn id_prefix(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
