//! Authorization decision engine for the relay gateway.
//!
//! Every proxied request is governed by exactly one of three tiers,
//! selected by the route classifier (see the `directory` crate):
//!
//! 1. **Anonymous** — no check at all; identity is attached when present
//!    but its absence is never an error.
//! 2. **Lookup** — attribute-based: values extracted from the request body
//!    at the rule's key must all be covered by the user's allowed set.
//! 3. **RoleBased** — delegated to the external policy engine's
//!    `is_allowed(username, resource, action)`.
//!
//! The decision engine fails closed: absent sessions on non-anonymous
//! tiers, missing permission entries, engine errors and configuration
//! conflicts all deny. It never queries the policy engine for requests on
//! the anonymous or lookup tiers.

pub mod engine;
pub mod error;
pub mod extract;

use directory::RouteTier;
use std::sync::Arc;
use tracing::{debug, warn};

pub use engine::{MemoryPolicyEngine, PolicyEngine};
pub use error::{AuthzError, Result};
pub use extract::extract_values;

/// Outcome of the tier-specific authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Why a request was denied. Maps onto the gateway's error taxonomy:
/// 401 / 403 / 400 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Identity was required but missing, invalid, or session-less.
    Unauthenticated,
    /// The policy or lookup check said no.
    InsufficientPermissions,
    /// The directory configuration is self-contradictory (same lookup URL
    /// bound to two keys). Hard deny, never a silent pick.
    ConfigurationAmbiguous,
}

/// Executes the tier-specific check for a classified request.
#[derive(Clone)]
pub struct DecisionEngine {
    policy: Arc<dyn PolicyEngine>,
}

impl DecisionEngine {
    pub fn new(policy: Arc<dyn PolicyEngine>) -> Self {
        Self { policy }
    }

    /// Decide whether a request may proceed.
    ///
    /// `username` is the authenticated identity, when one was restored;
    /// `body` is the parsed JSON request body, when one was present.
    ///
    /// # Tier semantics
    ///
    /// - `Anonymous` always allows; the policy engine is not consulted.
    /// - `Lookup` requires an identity; every value extracted at the
    ///   rule's key must be present in `permissions[username]` — all or
    ///   nothing, no partial credit. An empty extracted set is vacuously
    ///   covered as long as the user appears in the rule's permissions.
    /// - `RoleBased` requires an identity and delegates to the policy
    ///   engine; `false` and engine errors both deny.
    pub async fn decide(
        &self,
        tier: &RouteTier,
        username: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Decision {
        match tier {
            RouteTier::Anonymous => Decision::Allow,

            RouteTier::Lookup(rule) => {
                let Some(username) = username else {
                    return Decision::Deny(DenyReason::Unauthenticated);
                };
                let Some(allowed) = rule.permissions.get(username) else {
                    debug!(%username, url = %rule.url, "no lookup grants for user");
                    return Decision::Deny(DenyReason::InsufficientPermissions);
                };
                let extracted = body
                    .map(|b| extract_values(b, &rule.key))
                    .unwrap_or_default();
                if extracted.iter().all(|v| allowed.contains(v)) {
                    Decision::Allow
                } else {
                    debug!(
                        %username,
                        url = %rule.url,
                        key = %rule.key,
                        "extracted values not covered by lookup grants"
                    );
                    Decision::Deny(DenyReason::InsufficientPermissions)
                }
            }

            RouteTier::RoleBased { resource, action } => {
                let Some(username) = username else {
                    return Decision::Deny(DenyReason::Unauthenticated);
                };
                match self.policy.is_allowed(username, resource, action).await {
                    Ok(true) => Decision::Allow,
                    Ok(false) => {
                        debug!(%username, %resource, %action, "policy engine denied");
                        Decision::Deny(DenyReason::InsufficientPermissions)
                    }
                    Err(e) => {
                        // Fail closed on engine failure.
                        warn!(%username, %resource, %action, error = %e, "policy engine failure");
                        Decision::Deny(DenyReason::InsufficientPermissions)
                    }
                }
            }
        }
    }
}
