//! Argument partitioning: control parameters vs model fields.

use serde_json::Value;
use std::collections::HashMap;

pub const PAGE_KEY: &str = "_page";
pub const PAGE_LENGTH_KEY: &str = "_pagelength";
pub const QUERY_KEY: &str = "_query";
pub const SORT_BY_KEY: &str = "_sortby";
/// Reserved for internal injection; rejected when supplied by callers.
pub const SESSION_KEY: &str = "_session";

/// The full recognized control set. Everything else in a bag is a model field.
pub const CONTROL_KEYS: [&str; 5] = [
    PAGE_KEY,
    PAGE_LENGTH_KEY,
    QUERY_KEY,
    SORT_BY_KEY,
    SESSION_KEY,
];

pub const DEFAULT_PAGE_LENGTH: u32 = 100;
/// Server-side pagination cap; larger requests are clamped before dispatch.
pub const MAX_PAGE_LENGTH: u32 = 1000;

/// Flat request argument bag as supplied by callers.
pub type ArgMap = HashMap<String, Value>;

/// Split a bag into (control, model) arguments. Total and disjoint: every key
/// lands in exactly one of the two outputs.
pub fn partition(args: ArgMap) -> (ArgMap, ArgMap) {
    let mut control = ArgMap::new();
    let mut model = ArgMap::new();
    for (key, value) in args {
        if CONTROL_KEYS.contains(&key.as_str()) {
            control.insert(key, value);
        } else {
            model.insert(key, value);
        }
    }
    (control, model)
}

/// Render a bag as query pairs, sorted by key so URLs are deterministic.
/// Nulls are dropped; strings are sent verbatim, other scalars via their
/// display form.
pub fn to_query_pairs(args: &ArgMap) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = args
        .iter()
        .filter_map(|(key, value)| query_value(value).map(|v| (key.clone(), v)))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
