//! The external policy engine contract and an in-memory implementation.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

/// The role/resource/permission authorization backend.
///
/// The gateway consumes `is_allowed` on the hot path; `allow` and
/// `remove_resource` exist for the management surface and for test
/// doubles, and are never called while serving a request.
///
/// Implementations are injected dependencies, not singletons: the gateway
/// depends only on this trait.
#[async_trait]
pub trait PolicyEngine: Send + Sync {
    /// May `username` perform `action` on `resource`?
    ///
    /// Deny-by-default: an engine error must be treated as `false` by
    /// callers making access decisions.
    async fn is_allowed(&self, username: &str, resource: &str, action: &str) -> Result<bool>;

    /// Grant `username` the given actions on `resource`.
    async fn allow(&self, username: &str, resource: &str, actions: &[String]) -> Result<()>;

    /// Detach a resource and all grants on it. Idempotent.
    async fn remove_resource(&self, resource: &str) -> Result<()>;
}

/// In-memory policy engine: resource -> username -> allowed actions.
///
/// Backs tests and single-node deployments; production deployments point
/// the gateway at a remote engine behind the same trait.
#[derive(Default)]
pub struct MemoryPolicyEngine {
    grants: RwLock<HashMap<String, HashMap<String, BTreeSet<String>>>>,
}

impl MemoryPolicyEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyEngine for MemoryPolicyEngine {
    async fn is_allowed(&self, username: &str, resource: &str, action: &str) -> Result<bool> {
        let grants = self.grants.read().await;
        let allowed = grants
            .get(resource)
            .and_then(|users| users.get(username))
            .map(|actions| actions.contains(&action.to_ascii_lowercase()))
            .unwrap_or(false);
        debug!(%username, %resource, %action, allowed, "policy check");
        Ok(allowed)
    }

    async fn allow(&self, username: &str, resource: &str, actions: &[String]) -> Result<()> {
        let mut grants = self.grants.write().await;
        let entry = grants
            .entry(resource.to_string())
            .or_default()
            .entry(username.to_string())
            .or_default();
        entry.extend(actions.iter().map(|a| a.to_ascii_lowercase()));
        Ok(())
    }

    async fn remove_resource(&self, resource: &str) -> Result<()> {
        self.grants.write().await.remove(resource);
        Ok(())
    }
}
