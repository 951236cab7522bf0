// Session storage backends

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::id_prefix;

/// Trait for session storage backends.
///
/// Values are encoded session records. Implementations must be safe to call
/// from concurrently running request handlers.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Whether an entry exists for the identifier
    async fn exists(&self, session_id: &str) -> bool;

    /// Store a value, replacing any existing entry
    async fn insert(&self, session_id: String, value: Value);

    /// Get the stored value for an identifier
    async fn lookup(&self, session_id: &str) -> Option<Value>;

    /// Remove an entry; no-op when absent
    async fn remove(&self, session_id: &str);

    /// Number of stored entries
    async fn count(&self) -> usize;
}

/// In-memory session storage implementation
pub struct MemorySessionStorage {
    sessions: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemorySessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn exists(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions.contains_key(session_id)
    }

    async fn insert(&self, session_id: String, value: Value) {
        let mut sessions = self.sessions.write().await;
        debug!("Storing session {}", id_prefix(&session_id));
        sessions.insert(session_id, value);
    }

    async fn lookup(&self, session_id: &str) -> Option<Value> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    async fn remove(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(session_id).is_some() {
            debug!("Removed session {}", id_prefix(session_id));
        }
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
