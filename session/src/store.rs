//! Session storage keyed by the opaque token string.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

/// Server-held state associated with a bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,

    /// Arbitrary additional attributes merged into the request identity.
    #[serde(default)]
    pub claims: HashMap<String, serde_json::Value>,

    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: impl Into<String>, ttl: Duration) -> Self {
        Self {
            username: username.into(),
            claims: HashMap::new(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Keyed session store contract.
///
/// `get` treats expired entries as absent. `delete` (logout / revocation)
/// is idempotent; it is the only write the gateway's request path ever
/// performs against the store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: &str) -> Result<Option<Session>>;
    async fn put(&self, token: &str, session: Session) -> Result<()>;
    async fn delete(&self, token: &str) -> Result<()>;
}

/// In-memory session store with per-entry TTL.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<Session>> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired() => return Ok(Some(session.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // Expired entry: drop it so the map does not grow without bound.
        self.sessions.write().await.remove(token);
        debug!("expired session evicted on read");
        Ok(None)
    }

    async fn put(&self, token: &str, session: Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(token.to_string(), session);
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session time-to-live in seconds.
    pub ttl_seconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 86400, // 24 hours
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_round_trip() {
        let store = MemorySessionStore::new();
        let session = Session::new("dev", Duration::hours(1))
            .with_claim("role", serde_json::json!("editor"));
        store.put("tok1", session.clone()).await.unwrap();

        let restored = store.get("tok1").await.unwrap().unwrap();
        assert_eq!(restored.username, "dev");
        assert_eq!(restored.claims["role"], serde_json::json!("editor"));
    }

    #[tokio::test]
    async fn expired_session_reads_as_absent() {
        let store = MemorySessionStore::new();
        store
            .put("tok1", Session::new("dev", Duration::seconds(-1)))
            .await
            .unwrap();
        assert!(store.get("tok1").await.unwrap().is_none());
        // Evicted, not merely hidden.
        assert!(store.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemorySessionStore::new();
        store
            .put("tok1", Session::new("dev", Duration::hours(1)))
            .await
            .unwrap();
        store.delete("tok1").await.unwrap();
        store.delete("tok1").await.unwrap();
        assert!(store.get("tok1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_token_reads_as_absent() {
        let store = MemorySessionStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }
}
