//! Nested value extraction from request bodies.
//!
//! Lookup rules name a dot-delimited path into the parsed JSON body, e.g.
//! `docs._id`. Extraction walks that path; whenever a step lands on an
//! array it recurses into every element, so the result is a flattened set
//! of leaf values rather than a single scalar. A missing intermediate key
//! yields the empty set — that is a defined outcome, not an error.

use std::collections::BTreeSet;

use serde_json::Value;

/// Collect every leaf value reachable at `key` in `body`.
///
/// Leaves are rendered as their string form: strings without quotes,
/// numbers and booleans via their display form. Objects or arrays sitting
/// at the end of the path contribute nothing (a lookup permission can only
/// name scalar values).
pub fn extract_values(body: &Value, key: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let segments: Vec<&str> = key.split('.').filter(|s| !s.is_empty()).collect();
    walk(body, &segments, &mut out);
    out
}

fn walk(value: &Value, segments: &[&str], out: &mut BTreeSet<String>) {
    // Arrays fan out at every depth, before and after the path is spent.
    if let Value::Array(items) = value {
        for item in items {
            walk(item, segments, out);
        }
        return;
    }

    match segments.split_first() {
        None => {
            if let Some(leaf) = scalar_to_string(value) {
                out.insert(leaf);
            }
        }
        Some((seg, rest)) => {
            if let Value::Object(map) = value {
                if let Some(next) = map.get(*seg) {
                    walk(next, rest, out);
                }
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}
