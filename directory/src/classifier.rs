//! Route classification: which authorization tier governs a request.

use thiserror::Error;
use tracing::debug;

use crate::pattern::{first_match, PathPattern};
use crate::record::{ApplicationRecord, LookupRule};

/// The authorization tier selected for a request. Exactly one tier applies
/// per request; selection is deterministic given the record, sub-path and
/// method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTier {
    /// No credentials required.
    Anonymous,
    /// Attribute-based check against the matched lookup rule.
    Lookup(LookupRule),
    /// Role/resource/permission check delegated to the policy engine.
    RoleBased { resource: String, action: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// The same lookup URL is bound to two different body keys. The
    /// directory is inconsistent; fail closed rather than guess.
    #[error("lookup url '{url}' is bound to conflicting keys")]
    AmbiguousLookup { url: String },
}

/// Select the tier governing `sub_path` + `method` under `record`.
///
/// Precedence is strict and first-match-wins:
///
/// 1. `lookup_rules` in declaration order — a rule is selected when its
///    `url` matches the sub-path and its method set contains the verb. A
///    rule whose `url` matches but whose method set does not falls through
///    to the next rule, never to the anonymous tier: once any lookup URL
///    has matched the path, the request can only resolve to the lookup or
///    role-based tiers.
/// 2. `anonymous_routes` in order, method ignored.
/// 3. Role-based: resource is the first matching `protected_routes`
///    pattern, or the raw `prefix + sub_path` when none match; action is
///    the lowercased method.
pub fn classify(
    record: &ApplicationRecord,
    sub_path: &str,
    method: &str,
) -> Result<RouteTier, ClassifyError> {
    let mut lookup_url_matched = false;

    for rule in &record.lookup_rules {
        if !PathPattern::parse(&rule.url).matches(sub_path) {
            continue;
        }
        lookup_url_matched = true;
        if !rule.governs_method(method) {
            continue;
        }
        if let Some(other) = conflicting_rule(record, rule) {
            debug!(
                url = %rule.url,
                key_a = %rule.key,
                key_b = %other.key,
                "conflicting lookup keys for the same url"
            );
            return Err(ClassifyError::AmbiguousLookup {
                url: rule.url.clone(),
            });
        }
        return Ok(RouteTier::Lookup(rule.clone()));
    }

    if !lookup_url_matched && first_match(&record.anonymous_routes, sub_path).is_some() {
        return Ok(RouteTier::Anonymous);
    }

    let resource = match first_match(&record.protected_routes, sub_path) {
        Some(pattern) => pattern.to_string(),
        None => format!("{}{}", record.prefix, sub_path),
    };
    Ok(RouteTier::RoleBased {
        resource,
        action: method.to_ascii_lowercase(),
    })
}

fn conflicting_rule<'a>(
    record: &'a ApplicationRecord,
    rule: &LookupRule,
) -> Option<&'a LookupRule> {
    record
        .lookup_rules
        .iter()
        .find(|other| other.url == rule.url && other.key != rule.key)
}
