//! Common types and utilities for Alibaba Cloud RPC APIs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by RPC-style endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub code: String,
    #[serde(default)]
    pub message: String,
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Some actions answer HTTP 200 with `"Success": false` instead of an error status
    pub fn from_success_false(body: &Value) -> Option<Self> {
        if body.get("Success").and_then(Value::as_bool) != Some(false) {
            return None;
        }
        let code = body.get("Code").map(tflist::value::stringify)?;
        Some(Self {
            code,
            message: body
                .get("Message")
                .map(tflist::value::stringify)
                .unwrap_or_default(),
            request_id: body
                .get("RequestId")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// A `{"Key": ..., "Value": ...}` resource tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(alias = "TagKey")]
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(alias = "TagValue")]
    #[serde(rename = "Value", default)]
    pub value: String,
}

/// Ordered RPC query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcParams {
    params: Vec<(String, String)>,
}

impl RpcParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    /// Optional string parameter, skipped when blank
    pub fn add_non_empty<K: Into<String>>(mut self, key: K, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn extend(mut self, other: &RpcParams) -> Self {
        self.params.extend(other.params.iter().cloned());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}
