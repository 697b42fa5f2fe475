//! Application directory for the relay gateway.
//!
//! Maps a tenant prefix to its routing record: the real host to forward
//! to, the ordered protected / anonymous route lists, and the lookup
//! rules. The directory is read-only from the gateway's perspective —
//! records are created and mutated by an external management interface.
//!
//! Resolution is case-insensitive on the prefix, pure, and idempotent:
//! resolving the same prefix twice with no mutation in between returns
//! identical routing data.

pub mod classifier;
pub mod error;
pub mod pattern;
pub mod record;

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

pub use classifier::{classify, ClassifyError, RouteTier};
pub use error::{DirectoryError, Result};
pub use pattern::PathPattern;
pub use record::{ApplicationRecord, LookupRule};

/// Resolution contract consumed by the gateway.
///
/// Implementations are shared, externally synchronized resources; `resolve`
/// must be a pure read with no visible side effects.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Look up the routing record for `prefix` (case-insensitive).
    /// `Ok(None)` means no such application is registered — the gateway
    /// never fabricates a record on a miss.
    async fn resolve(&self, prefix: &str) -> Result<Option<ApplicationRecord>>;

    /// Number of registered applications, for health reporting.
    async fn count(&self) -> Result<usize>;
}

/// Directory backed by a fixed set of records loaded at startup.
#[derive(Debug)]
pub struct StaticDirectory {
    records: HashMap<String, ApplicationRecord>,
}

impl StaticDirectory {
    /// Build a directory from records, enforcing the uniqueness invariants
    /// on `prefix` and `host`.
    pub fn new(records: Vec<ApplicationRecord>) -> Result<Self> {
        let mut by_prefix: HashMap<String, ApplicationRecord> = HashMap::new();
        for record in records {
            let key = record.prefix.to_lowercase();
            if by_prefix.contains_key(&key) {
                return Err(DirectoryError::DuplicatePrefix(record.prefix));
            }
            if !record.host.trim().is_empty()
                && by_prefix.values().any(|r| r.host == record.host)
            {
                return Err(DirectoryError::DuplicateHost(record.host));
            }
            by_prefix.insert(key, record);
        }
        info!(applications = by_prefix.len(), "static directory loaded");
        Ok(Self { records: by_prefix })
    }

    /// Load records from a JSON file containing an array of records.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<ApplicationRecord> = serde_json::from_str(&raw)?;
        Self::new(records)
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn resolve(&self, prefix: &str) -> Result<Option<ApplicationRecord>> {
        let record = self.records.get(&prefix.to_lowercase()).cloned();
        debug!(prefix = %prefix, found = record.is_some(), "directory lookup");
        Ok(record)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prefix: &str, host: &str) -> ApplicationRecord {
        ApplicationRecord {
            prefix: prefix.to_string(),
            host: host.to_string(),
            name: String::new(),
            owner: String::new(),
            protected_routes: vec![],
            anonymous_routes: vec![],
            lookup_rules: vec![],
        }
    }

    #[tokio::test]
    async fn resolve_is_case_insensitive() {
        let dir = StaticDirectory::new(vec![record("Acme", "http://a")]).unwrap();
        assert!(dir.resolve("acme").await.unwrap().is_some());
        assert!(dir.resolve("ACME").await.unwrap().is_some());
        assert!(dir.resolve("Acme").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_prefix_resolves_to_none() {
        let dir = StaticDirectory::new(vec![record("acme", "http://a")]).unwrap();
        assert!(dir.resolve("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let dir = StaticDirectory::new(vec![record("acme", "http://a")]).unwrap();
        let first = dir.resolve("acme").await.unwrap();
        let second = dir.resolve("acme").await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
        let err = StaticDirectory::new(vec![
            record("acme", "http://a"),
            record("ACME", "http://b"),
        ])
        .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicatePrefix(_)));
    }

    #[test]
    fn duplicate_host_is_rejected() {
        let err = StaticDirectory::new(vec![
            record("acme", "http://a"),
            record("beta", "http://a"),
        ])
        .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateHost(_)));
    }
}
