pub mod api;
pub mod config;
pub mod data_sources;

use serde_json::{Map, Value};
use std::collections::HashMap;

use api::ApiError;
use config::ProviderConfig;
use data_sources::{DataSource, DataSourceError, DataSourceState};

/// Constructor for a registered data source
pub type DataSourceFactory = fn() -> Box<dyn DataSource>;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{name} is required (set in provider config or {env} env var)")]
    MissingSetting {
        name: &'static str,
        env: &'static str,
    },

    #[error("Invalid {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },

    #[error("Provider not configured")]
    NotConfigured,

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("Failed to create API client: {0}")]
    Client(#[from] ApiError),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

pub struct AlicloudProvider {
    client: Option<api::Client>,
}

impl Default for AlicloudProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AlicloudProvider {
    pub fn new() -> Self {
        Self { client: None }
    }

    pub fn configure(&mut self, config: &Map<String, Value>) -> Result<(), ProviderError> {
        let settings = ProviderConfig::from_values(config)?;
        let region = settings.region.clone();
        let client = api::Client::new(settings.into_client_config())?;

        tracing::info!("Configured provider for region {}", region);
        self.client = Some(client);
        Ok(())
    }

    pub fn client(&self) -> Result<&api::Client, ProviderError> {
        self.client.as_ref().ok_or(ProviderError::NotConfigured)
    }

    /// Registry of data source type names
    pub fn data_sources(&self) -> &'static HashMap<&'static str, DataSourceFactory> {
        static REGISTRY: std::sync::OnceLock<HashMap<&'static str, DataSourceFactory>> =
            std::sync::OnceLock::new();

        REGISTRY.get_or_init(|| {
            let mut factories: HashMap<&'static str, DataSourceFactory> = HashMap::new();
            factories.insert(data_sources::vpcs::TYPE_NAME, || -> Box<dyn DataSource> {
                Box::new(data_sources::VpcsDataSource::new())
            });
            factories.insert(data_sources::vswitches::TYPE_NAME, || -> Box<dyn DataSource> {
                Box::new(data_sources::VSwitchesDataSource::new())
            });
            factories.insert(data_sources::instances::TYPE_NAME, || -> Box<dyn DataSource> {
                Box::new(data_sources::InstancesDataSource::new())
            });
            factories.insert(data_sources::images::TYPE_NAME, || -> Box<dyn DataSource> {
                Box::new(data_sources::ImagesDataSource::new())
            });
            factories.insert(data_sources::route_entries::TYPE_NAME, || -> Box<dyn DataSource> {
                Box::new(data_sources::RouteEntriesDataSource::new())
            });
            factories
        })
    }

    pub fn create_data_source(&self, name: &str) -> Result<Box<dyn DataSource>, ProviderError> {
        self.client()?;

        self.data_sources()
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ProviderError::UnknownDataSource(name.to_string()))
    }

    pub async fn read_data_source(
        &self,
        type_name: &str,
        config: Value,
    ) -> Result<DataSourceState, ProviderError> {
        let data_source = self.create_data_source(type_name)?;
        let client = self.client()?;

        let state = data_source.read(client, config).await?;
        tracing::info!(
            "{} read {} items (id {})",
            type_name,
            state.len(),
            state.id
        );
        Ok(state)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            config::ENV_ACCESS_KEY,
            config::ENV_SECRET_KEY,
            config::ENV_SECURITY_TOKEN,
            config::ENV_REGION,
            config::ENV_INSECURE,
        ] {
            std::env::remove_var(var);
        }
    }

    fn values(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    #[serial]
    fn provider_configures_successfully_with_env_vars() {
        clear_env();
        std::env::set_var(config::ENV_ACCESS_KEY, "env-ak");
        std::env::set_var(config::ENV_SECRET_KEY, "env-sk");
        std::env::set_var(config::ENV_REGION, "cn-shanghai");
        std::env::set_var(config::ENV_INSECURE, "true");

        let mut provider = AlicloudProvider::new();
        provider.configure(&Map::new()).unwrap();
        assert_eq!(provider.client().unwrap().region(), "cn-shanghai");

        clear_env();
    }

    #[test]
    #[serial]
    fn provider_config_values_win_over_env() {
        clear_env();
        std::env::set_var(config::ENV_REGION, "cn-shanghai");

        let settings = ProviderConfig::from_values(&values(json!({
            "access_key": "cfg-ak",
            "region": "eu-west-1",
            "security_token": "sts",
            "max_retries": 0
        })))
        .unwrap();
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.credentials.access_key, "cfg-ak");
        assert_eq!(settings.credentials.security_token.as_deref(), Some("sts"));
        assert_eq!(settings.into_client_config().retry.max_retries, 0);

        clear_env();
    }

    #[test]
    #[serial]
    fn provider_configure_requires_region() {
        clear_env();
        std::env::set_var(config::ENV_ACCESS_KEY, "env-ak");

        let mut provider = AlicloudProvider::new();
        let err = provider.configure(&Map::new()).unwrap_err();
        assert!(err.to_string().contains("region is required"));
        assert!(err.to_string().contains("ALICLOUD_REGION"));

        clear_env();
    }

    #[test]
    #[serial]
    fn provider_configure_requires_access_key() {
        clear_env();

        let mut provider = AlicloudProvider::new();
        let err = provider
            .configure(&values(json!({"region": "cn-hangzhou"})))
            .unwrap_err();
        assert!(err.to_string().contains("access_key is required"));
        assert!(provider.client().is_err());
    }

    #[test]
    #[serial]
    fn provider_rejects_unknown_endpoint_product() {
        clear_env();

        let err = ProviderConfig::from_values(&values(json!({
            "access_key": "ak",
            "region": "cn-hangzhou",
            "endpoints": {"rds": "https://rds.example.com"}
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::InvalidSetting {
                name: "endpoints",
                ..
            }
        ));
    }

    #[test]
    #[serial]
    fn provider_rejects_negative_max_retries() {
        clear_env();

        let err = ProviderConfig::from_values(&values(json!({
            "access_key": "ak",
            "region": "cn-hangzhou",
            "max_retries": -1
        })))
        .unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    #[serial]
    fn provider_creates_data_sources_after_configuration() {
        clear_env();

        let mut provider = AlicloudProvider::new();
        provider
            .configure(&values(json!({"access_key": "ak", "region": "cn-hangzhou"})))
            .unwrap();

        for name in provider.data_sources().keys() {
            let data_source = provider.create_data_source(name).unwrap();
            assert_eq!(data_source.type_name(), *name);
        }

        let unknown = provider.create_data_source("alicloud_unknown");
        assert!(matches!(unknown, Err(ProviderError::UnknownDataSource(_))));
    }

    #[tokio::test]
    async fn provider_fails_to_read_before_configuration() {
        let provider = AlicloudProvider::new();

        let err = provider
            .read_data_source("alicloud_vpcs", Value::Null)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Provider not configured"));
    }

    #[test]
    fn registry_contains_all_listing_data_sources() {
        let provider = AlicloudProvider::new();
        let mut names: Vec<_> = provider.data_sources().keys().copied().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "alicloud_images",
                "alicloud_instances",
                "alicloud_route_entries",
                "alicloud_vpcs",
                "alicloud_vswitches",
            ]
        );
    }
}
