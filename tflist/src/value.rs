//! Coercion helpers for loosely typed backend values
//!
//! Listing APIs are inconsistent about scalar types: ids come back as
//! numbers on some actions, booleans as `"true"`, counts as strings. These
//! helpers are meant for `#[serde(deserialize_with = ...)]` on typed items so
//! the coercion happens once, at decode time.

use serde_json::Value;

/// Textual form of a scalar; `null` becomes the empty string
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Deserialize any scalar into a `String`
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(_) | Value::Object(_) => Err(serde::de::Error::custom(
                "expected a string or number, got a nested value",
            )),
            scalar => Ok(super::stringify(&scalar)),
        }
    }
}

/// Deserialize `true`, `"true"`, `1` and friends into a `bool`
pub mod lenient_bool {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum BoolLike {
            Bool(bool),
            Int(u8),
            Str(String),
        }

        match Option::<BoolLike>::deserialize(deserializer)? {
            None => Ok(false),
            Some(BoolLike::Bool(b)) => Ok(b),
            Some(BoolLike::Int(0)) => Ok(false),
            Some(BoolLike::Int(1)) => Ok(true),
            Some(BoolLike::Int(_)) => Err(serde::de::Error::custom("expected 0 or 1")),
            Some(BoolLike::Str(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                other => Err(serde::de::Error::custom(format!(
                    "expected a boolean, got {:?}",
                    other
                ))),
            },
        }
    }
}

/// Deserialize a number or numeric string into `Option<u64>`
pub mod lenient_u64 {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrU64 {
            U64(u64),
            String(String),
        }

        match Option::<StringOrU64>::deserialize(deserializer)? {
            Some(StringOrU64::U64(u)) => Ok(Some(u)),
            Some(StringOrU64::String(s)) if s.is_empty() => Ok(None),
            Some(StringOrU64::String(s)) => {
                s.parse::<u64>().map(Some).map_err(serde::de::Error::custom)
            }
            None => Ok(None),
        }
    }
}

/// Deserialize a one-key wrapper such as `{"VSwitchId": ["vsw-1"]}` into its list
pub mod nested_list {
    use serde::{Deserialize, Deserializer};
    use std::collections::HashMap;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let wrapper = Option::<HashMap<String, Vec<T>>>::deserialize(deserializer)?;
        Ok(wrapper
            .and_then(|map| map.into_values().next())
            .unwrap_or_default())
    }
}
