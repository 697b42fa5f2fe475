//! Tenant routing records.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One registered application (tenant), keyed by its unique prefix.
///
/// The field names on the wire match the directory record shape the
/// management interface produces: `routes` is the ordered list of
/// protected route patterns, `anonymous` the ordered list of open
/// patterns, and `look` the ordered list of lookup rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Unique tenant identifier segment; compared case-insensitively.
    pub prefix: String,

    /// Target base URL of the tenant's real host. Unique across records.
    pub host: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub owner: String,

    /// Ordered protected route patterns. First match wins when mapping a
    /// sub-path to a policy resource. This list is the authoritative
    /// resource set the policy engine was configured with for the tenant.
    #[serde(rename = "routes", default)]
    pub protected_routes: Vec<String>,

    /// Ordered patterns reachable without any credentials.
    #[serde(rename = "anonymous", default)]
    pub anonymous_routes: Vec<String>,

    /// Ordered attribute-based access rules.
    #[serde(rename = "look", default)]
    pub lookup_rules: Vec<LookupRule>,
}

impl ApplicationRecord {
    /// Whether the record has a routable host configured.
    pub fn has_host(&self) -> bool {
        !self.host.trim().is_empty()
    }
}

/// An attribute-based access rule keyed by a value extracted from the
/// request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRule {
    /// Path pattern this rule governs.
    pub url: String,

    /// Dot-delimited path into the request body identifying the value(s)
    /// to extract, e.g. `docs._id`.
    pub key: String,

    /// HTTP verbs this rule governs, matched case-insensitively.
    #[serde(default)]
    pub methods: BTreeSet<String>,

    /// username -> set of extracted values that user may present.
    #[serde(default)]
    pub permissions: BTreeMap<String, BTreeSet<String>>,
}

impl LookupRule {
    /// Case-insensitive membership test for the rule's method set.
    pub fn governs_method(&self, method: &str) -> bool {
        self.methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> serde_json::Value {
        serde_json::json!({
            "prefix": "acme",
            "host": "http://acme.internal:8080",
            "name": "Acme",
            "owner": "ops@acme.example",
            "routes": ["/orders/:id", "/reports/*"],
            "anonymous": ["/status"],
            "look": [{
                "url": "/dashboards/:id",
                "key": "params.id",
                "methods": ["put"],
                "permissions": { "dev": ["dash1"] }
            }]
        })
    }

    #[test]
    fn deserializes_wire_shape() {
        let record: ApplicationRecord = serde_json::from_value(record_json()).unwrap();
        assert_eq!(record.prefix, "acme");
        assert_eq!(record.protected_routes, vec!["/orders/:id", "/reports/*"]);
        assert_eq!(record.anonymous_routes, vec!["/status"]);
        assert_eq!(record.lookup_rules.len(), 1);
        assert_eq!(record.lookup_rules[0].key, "params.id");
        assert!(record.lookup_rules[0].permissions["dev"].contains("dash1"));
    }

    #[test]
    fn optional_lists_default_to_empty() {
        let record: ApplicationRecord = serde_json::from_value(serde_json::json!({
            "prefix": "bare",
            "host": "http://bare.internal"
        }))
        .unwrap();
        assert!(record.protected_routes.is_empty());
        assert!(record.anonymous_routes.is_empty());
        assert!(record.lookup_rules.is_empty());
    }

    #[test]
    fn method_membership_is_case_insensitive() {
        let record: ApplicationRecord = serde_json::from_value(record_json()).unwrap();
        let rule = &record.lookup_rules[0];
        assert!(rule.governs_method("PUT"));
        assert!(rule.governs_method("put"));
        assert!(!rule.governs_method("POST"));
    }

    #[test]
    fn empty_host_is_not_routable() {
        let mut record: ApplicationRecord = serde_json::from_value(record_json()).unwrap();
        assert!(record.has_host());
        record.host = "  ".to_string();
        assert!(!record.has_host());
    }
}
