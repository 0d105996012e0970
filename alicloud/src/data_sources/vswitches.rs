//! `alicloud_vswitches` data source

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tflist::list_filter_project;

use super::{filter_spec, finish, parse_args, tags_map, DataSource, DataSourceError, DataSourceState};
use crate::api::vpc::{DescribeVSwitchesRequest, VSwitch};
use crate::api::{Client, RpcLister};

pub const TYPE_NAME: &str = "alicloud_vswitches";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VSwitchesArgs {
    pub name_regex: Option<String>,
    pub ids: Option<Vec<String>>,
    pub vpc_id: Option<String>,
    pub zone_id: Option<String>,
    pub is_default: Option<bool>,
    pub resource_group_id: Option<String>,
    pub output_file: Option<String>,
}

impl VSwitchesArgs {
    fn request(&self) -> DescribeVSwitchesRequest {
        DescribeVSwitchesRequest {
            vpc_id: self.vpc_id.clone(),
            zone_id: self.zone_id.clone(),
            is_default: self.is_default,
            resource_group_id: self.resource_group_id.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VSwitchRecord {
    pub id: String,
    pub vswitch_id: String,
    pub vswitch_name: String,
    pub name: String,
    pub vpc_id: String,
    pub zone_id: String,
    pub cidr_block: String,
    pub ipv6_cidr_block: String,
    pub status: String,
    pub is_default: bool,
    pub description: String,
    pub creation_time: String,
    pub available_ip_address_count: Option<u64>,
    pub resource_group_id: String,
    pub route_table_id: String,
    pub network_acl_id: String,
    pub tags: BTreeMap<String, String>,
}

impl From<&VSwitch> for VSwitchRecord {
    fn from(vsw: &VSwitch) -> Self {
        Self {
            id: vsw.vswitch_id.clone(),
            vswitch_id: vsw.vswitch_id.clone(),
            vswitch_name: vsw.vswitch_name.clone(),
            name: vsw.vswitch_name.clone(),
            vpc_id: vsw.vpc_id.clone(),
            zone_id: vsw.zone_id.clone(),
            cidr_block: vsw.cidr_block.clone(),
            ipv6_cidr_block: vsw.ipv6_cidr_block.clone(),
            status: vsw.status.clone(),
            is_default: vsw.is_default,
            description: vsw.description.clone(),
            creation_time: vsw.creation_time.clone(),
            available_ip_address_count: vsw.available_ip_address_count,
            resource_group_id: vsw.resource_group_id.clone(),
            route_table_id: vsw.route_table.route_table_id.clone(),
            network_acl_id: vsw.network_acl_id.clone(),
            tags: tags_map(&vsw.tags),
        }
    }
}

#[derive(Debug, Default)]
pub struct VSwitchesDataSource;

impl VSwitchesDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for VSwitchesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, client: &Client, config: Value) -> Result<DataSourceState, DataSourceError> {
        let args: VSwitchesArgs = parse_args(TYPE_NAME, config)?;
        let filter = filter_spec(args.name_regex.as_deref(), args.ids.as_deref())?;

        let lister = RpcLister::new(client.clone(), args.request());
        let outcome =
            list_filter_project(&lister, &filter, |vsw: &VSwitch| VSwitchRecord::from(vsw)).await?;

        finish(TYPE_NAME, "vswitches", outcome, args.output_file.as_deref()).await
    }
}
