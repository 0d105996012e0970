//! Typed decode of listing responses
//!
//! Resolves `$.A.B` style paths in a JSON response and decodes the array
//! found there into concrete item structs. This is the only place raw
//! response maps are inspected.

use crate::error::{ListError, Result};
use crate::value::stringify;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Resolve a dotted path (`$.Vpcs.Vpc` or `Vpcs.Vpc`) inside `response`
pub fn lookup<'a>(response: &'a Value, path: &str) -> Option<&'a Value> {
    let trimmed = path.trim_start_matches('$').trim_start_matches('.');
    if trimmed.is_empty() {
        return Some(response);
    }
    trimmed
        .split('.')
        .try_fold(response, |current, segment| current.get(segment))
}

/// Decode the array at `path` into typed items
pub fn items<T: DeserializeOwned>(response: &Value, path: &str) -> Result<Vec<T>> {
    let array = lookup(response, path)
        .and_then(Value::as_array)
        .ok_or_else(|| ListError::extraction(path, response))?;

    array
        .iter()
        .map(|item| {
            T::deserialize(item).map_err(|source| ListError::Decode {
                path: path.to_string(),
                source,
            })
        })
        .collect()
}

/// Continuation token of a token-paginated response
pub fn next_token(response: &Value) -> Option<String> {
    response
        .get("NextToken")
        .map(stringify)
        .filter(|token| !token.is_empty())
}

/// `TotalCount` of a page-number response, when the backend reports it
pub fn total_count(response: &Value) -> Option<u64> {
    match response.get("TotalCount")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
