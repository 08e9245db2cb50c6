//! Action parameter canonicalization.
//!
//! Raw parameter strings arrive in whatever shape the caller produced them;
//! cache records are keyed by the canonical form so that semantically
//! equivalent inputs collapse to one cache key.

use std::collections::HashMap;

/// Canonicalize a raw parameter string against an action's ordered schema.
///
/// This is the contract shared with the action-parameter service and must
/// not drift from it:
/// - the raw string is a `/`-separated list of `name=value` segments; a
///   segment without `=` is a name with an empty value; empty segments are
///   ignored,
/// - names not present in the schema are dropped,
/// - the output lists the surviving parameters in schema order as
///   `name=value`, joined by `/`; names absent from the raw string are
///   omitted,
/// - on duplicate names the last occurrence wins.
///
/// Deterministic: two raw strings carrying the same schema-relevant values
/// canonicalize identically regardless of segment order or extra names.
pub fn canonicalize(raw: &str, schema: &[String]) -> String {
    let mut values: HashMap<&str, &str> = HashMap::new();
    for segment in raw.split('/') {
        if segment.is_empty() {
            continue;
        }
        match segment.split_once('=') {
            Some((name, value)) => values.insert(name, value),
            None => values.insert(segment, ""),
        };
    }

    let mut parts = Vec::new();
    for name in schema {
        if let Some(value) = values.get(name.as_str()) {
            parts.push(format!("{name}={value}"));
        }
    }
    parts.join("/")
}
