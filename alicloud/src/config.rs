//! Provider settings
//!
//! Each setting is taken from the provider config map first and falls back
//! to its `ALICLOUD_*` environment variable.

use serde_json::{Map, Value};

use crate::api::{ClientConfig, Credentials, Endpoints, Product, RetryConfig};
use crate::ProviderError;

pub const ENV_ACCESS_KEY: &str = "ALICLOUD_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "ALICLOUD_SECRET_KEY";
pub const ENV_SECURITY_TOKEN: &str = "ALICLOUD_SECURITY_TOKEN";
pub const ENV_REGION: &str = "ALICLOUD_REGION";
pub const ENV_INSECURE: &str = "ALICLOUD_INSECURE";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub credentials: Credentials,
    pub region: String,
    pub endpoints: Endpoints,
    pub insecure: bool,
    pub max_retries: Option<u32>,
}

impl ProviderConfig {
    pub fn from_values(values: &Map<String, Value>) -> Result<Self, ProviderError> {
        let access_key = string_setting(values, "access_key", ENV_ACCESS_KEY).ok_or(
            ProviderError::MissingSetting {
                name: "access_key",
                env: ENV_ACCESS_KEY,
            },
        )?;
        let region = string_setting(values, "region", ENV_REGION).ok_or(
            ProviderError::MissingSetting {
                name: "region",
                env: ENV_REGION,
            },
        )?;
        let secret_key = string_setting(values, "secret_key", ENV_SECRET_KEY).unwrap_or_default();

        let mut credentials = Credentials::new(access_key, secret_key);
        if let Some(token) = string_setting(values, "security_token", ENV_SECURITY_TOKEN) {
            credentials = credentials.with_security_token(token);
        }

        let insecure = values
            .get("insecure")
            .and_then(Value::as_bool)
            .or_else(|| {
                std::env::var(ENV_INSECURE)
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok())
            })
            .unwrap_or(false);

        Ok(Self {
            credentials,
            region,
            endpoints: endpoints_setting(values)?,
            insecure,
            max_retries: max_retries_setting(values)?,
        })
    }

    pub fn into_client_config(self) -> ClientConfig {
        let mut retry = RetryConfig::default();
        if let Some(max_retries) = self.max_retries {
            retry.max_retries = max_retries;
        }
        ClientConfig {
            credentials: self.credentials,
            region: self.region,
            endpoints: self.endpoints,
            insecure: self.insecure,
            retry,
        }
    }
}

fn string_setting(values: &Map<String, Value>, key: &str, env: &str) -> Option<String> {
    values
        .get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env).ok().filter(|v| !v.is_empty()))
}

fn endpoints_setting(values: &Map<String, Value>) -> Result<Endpoints, ProviderError> {
    let invalid = |message: String| ProviderError::InvalidSetting {
        name: "endpoints",
        message,
    };

    let mut endpoints = Endpoints::new();
    let Some(raw) = values.get("endpoints") else {
        return Ok(endpoints);
    };
    let map = raw
        .as_object()
        .ok_or_else(|| invalid("expected a map of product to URL".to_string()))?;

    for (code, url) in map {
        let product =
            Product::from_code(code).ok_or_else(|| invalid(format!("unknown product {:?}", code)))?;
        let url = url
            .as_str()
            .ok_or_else(|| invalid(format!("endpoint for {} must be a string", code)))?;
        endpoints = endpoints.with_override(product, url);
    }
    Ok(endpoints)
}

fn max_retries_setting(values: &Map<String, Value>) -> Result<Option<u32>, ProviderError> {
    match values.get("max_retries") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ProviderError::InvalidSetting {
                name: "max_retries",
                message: format!("expected a non-negative integer, got {}", value),
            }),
    }
}
