//! Listing data sources
//!
//! Every data source here follows the same read: decode its arguments,
//! build a typed list request carrying the server-side filters, run
//! [`tflist::list_filter_project`] with the client-side `name_regex`/`ids`
//! filter, and flatten the outcome into a [`DataSourceState`].

pub mod images;
pub mod instances;
pub mod route_entries;
pub mod vpcs;
pub mod vswitches;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tflist::{FilterSpec, ListError, ListOutcome};

use crate::api::{Client, Tag};

pub use images::ImagesDataSource;
pub use instances::InstancesDataSource;
pub use route_entries::RouteEntriesDataSource;
pub use vpcs::VpcsDataSource;
pub use vswitches::VSwitchesDataSource;

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("Invalid configuration for {type_name}: {source}")]
    InvalidConfig {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    List(#[from] ListError),

    #[error("Failed to encode {type_name} records: {source}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Writing output file {} failed: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A listing data source
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Read the data source for the given JSON arguments
    async fn read(&self, client: &Client, config: Value) -> Result<DataSourceState, DataSourceError>;
}

/// Computed state of one read
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceState {
    pub id: String,
    pub ids: Vec<String>,
    pub names: Vec<String>,
    /// Attribute the records are published under, e.g. `vpcs`
    pub records_key: &'static str,
    pub records: Vec<Value>,
}

impl DataSourceState {
    pub fn from_outcome<R: Serialize>(
        type_name: &'static str,
        records_key: &'static str,
        outcome: ListOutcome<R>,
    ) -> Result<Self, DataSourceError> {
        let id = outcome.result_id();
        let ids = outcome.ids();
        let names = outcome.names();
        let records = outcome
            .into_records()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| DataSourceError::Encode { type_name, source })?;

        Ok(Self {
            id,
            ids,
            names,
            records_key,
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("ids".to_string(), Value::from(self.ids.clone()));
        map.insert("names".to_string(), Value::from(self.names.clone()));
        map.insert(
            self.records_key.to_string(),
            Value::Array(self.records.clone()),
        );
        Value::Object(map)
    }
}

/// Decode data source arguments; a `null` config means no arguments
pub(crate) fn parse_args<T: DeserializeOwned>(
    type_name: &'static str,
    config: Value,
) -> Result<T, DataSourceError> {
    let config = match config {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(config)
        .map_err(|source| DataSourceError::InvalidConfig { type_name, source })
}

pub(crate) fn filter_spec(
    name_regex: Option<&str>,
    ids: Option<&[String]>,
) -> Result<FilterSpec, DataSourceError> {
    Ok(FilterSpec::new(name_regex, ids.map(|ids| ids.iter()))?)
}

/// Build the state and write `output_file` when one is configured
pub(crate) async fn finish<R: Serialize>(
    type_name: &'static str,
    records_key: &'static str,
    outcome: ListOutcome<R>,
    output_file: Option<&str>,
) -> Result<DataSourceState, DataSourceError> {
    let state = DataSourceState::from_outcome(type_name, records_key, outcome)?;

    if let Some(path) = output_file.filter(|p| !p.is_empty()) {
        write_output_file(path, &state.records).await?;
        tracing::debug!("{} wrote {} records to {}", type_name, state.len(), path);
    }

    Ok(state)
}

/// Write records as tab-indented JSON, replacing any existing file
pub async fn write_output_file(path: &str, records: &[Value]) -> Result<(), DataSourceError> {
    let output_error = |source| DataSourceError::Output {
        path: PathBuf::from(path),
        source,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut serializer)
        .map_err(|e| output_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    tokio::fs::write(path, buf).await.map_err(output_error)
}

pub(crate) fn tags_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|tag| (tag.key.clone(), tag.value.clone()))
        .collect()
}
