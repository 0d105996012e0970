//! `alicloud_route_entries` data source
//!
//! Route entries are listed per route table with token pagination. Their
//! id is `<route_table_id>:<route_entry_id>`, which is also what the `ids`
//! argument is matched against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tflist::{list_filter_project, Listed};

use super::{filter_spec, finish, parse_args, DataSource, DataSourceError, DataSourceState};
use crate::api::vpc::{DescribeRouteEntryListRequest, NextHop, RouteEntry};
use crate::api::{Client, RpcLister};

pub const TYPE_NAME: &str = "alicloud_route_entries";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntriesArgs {
    pub route_table_id: String,
    pub name_regex: Option<String>,
    pub ids: Option<Vec<String>>,
    pub cidr_block: Option<String>,
    /// Next hop id
    pub instance_id: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub output_file: Option<String>,
}

impl RouteEntriesArgs {
    fn request(&self) -> DescribeRouteEntryListRequest {
        DescribeRouteEntryListRequest {
            destination_cidr_block: self.cidr_block.clone(),
            next_hop_id: self.instance_id.clone(),
            route_entry_type: self.entry_type.clone(),
            ..DescribeRouteEntryListRequest::new(self.route_table_id.clone())
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NextHopRecord {
    pub next_hop_type: String,
    pub next_hop_id: String,
}

impl From<&NextHop> for NextHopRecord {
    fn from(hop: &NextHop) -> Self {
        Self {
            next_hop_type: hop.next_hop_type.clone(),
            next_hop_id: hop.next_hop_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEntryRecord {
    pub id: String,
    pub route_table_id: String,
    pub route_entry_id: String,
    pub name: String,
    pub cidr_block: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub status: String,
    pub description: String,
    pub ip_version: String,
    pub instance_id: String,
    pub next_hop_type: String,
    pub next_hops: Vec<NextHopRecord>,
}

impl From<&RouteEntry> for RouteEntryRecord {
    fn from(entry: &RouteEntry) -> Self {
        let first_hop = entry.next_hops.first();
        Self {
            id: entry.id(),
            route_table_id: entry.route_table_id.clone(),
            route_entry_id: entry.route_entry_id.clone(),
            name: entry.route_entry_name.clone(),
            cidr_block: entry.destination_cidr_block.clone(),
            entry_type: entry.entry_type.clone(),
            status: entry.status.clone(),
            description: entry.description.clone(),
            ip_version: entry.ip_version.clone(),
            instance_id: first_hop
                .map(|hop| hop.next_hop_id.clone())
                .unwrap_or_default(),
            next_hop_type: first_hop
                .map(|hop| hop.next_hop_type.clone())
                .unwrap_or_default(),
            next_hops: entry.next_hops.iter().map(NextHopRecord::from).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RouteEntriesDataSource;

impl RouteEntriesDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for RouteEntriesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, client: &Client, config: Value) -> Result<DataSourceState, DataSourceError> {
        let args: RouteEntriesArgs = parse_args(TYPE_NAME, config)?;
        let filter = filter_spec(args.name_regex.as_deref(), args.ids.as_deref())?;

        let lister = RpcLister::new(client.clone(), args.request());
        let outcome = list_filter_project(&lister, &filter, |entry: &RouteEntry| {
            RouteEntryRecord::from(entry)
        })
        .await?;

        finish(TYPE_NAME, "entries", outcome, args.output_file.as_deref()).await
    }
}
