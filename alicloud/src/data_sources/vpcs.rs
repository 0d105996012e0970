//! `alicloud_vpcs` data source

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tflist::list_filter_project;

use super::{filter_spec, finish, parse_args, tags_map, DataSource, DataSourceError, DataSourceState};
use crate::api::vpc::{DescribeVpcsRequest, Vpc};
use crate::api::{Client, RpcLister};

pub const TYPE_NAME: &str = "alicloud_vpcs";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VpcsArgs {
    pub name_regex: Option<String>,
    pub ids: Option<Vec<String>>,
    /// Exact name, filtered by the service
    pub vpc_name: Option<String>,
    pub is_default: Option<bool>,
    pub resource_group_id: Option<String>,
    pub dhcp_options_set_id: Option<String>,
    pub output_file: Option<String>,
}

impl VpcsArgs {
    fn request(&self) -> DescribeVpcsRequest {
        DescribeVpcsRequest {
            vpc_name: self.vpc_name.clone(),
            is_default: self.is_default,
            resource_group_id: self.resource_group_id.clone(),
            dhcp_options_set_id: self.dhcp_options_set_id.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VpcRecord {
    pub id: String,
    pub vpc_id: String,
    pub vpc_name: String,
    pub region_id: String,
    pub status: String,
    pub cidr_block: String,
    pub ipv6_cidr_block: String,
    pub vrouter_id: String,
    pub vswitch_ids: Vec<String>,
    pub user_cidrs: Vec<String>,
    pub description: String,
    pub is_default: bool,
    pub creation_time: String,
    pub resource_group_id: String,
    pub dhcp_options_set_id: String,
    pub tags: BTreeMap<String, String>,
}

impl From<&Vpc> for VpcRecord {
    fn from(vpc: &Vpc) -> Self {
        Self {
            id: vpc.vpc_id.clone(),
            vpc_id: vpc.vpc_id.clone(),
            vpc_name: vpc.vpc_name.clone(),
            region_id: vpc.region_id.clone(),
            status: vpc.status.clone(),
            cidr_block: vpc.cidr_block.clone(),
            ipv6_cidr_block: vpc.ipv6_cidr_block.clone(),
            vrouter_id: vpc.vrouter_id.clone(),
            vswitch_ids: vpc.vswitch_ids.clone(),
            user_cidrs: vpc.user_cidrs.clone(),
            description: vpc.description.clone(),
            is_default: vpc.is_default,
            creation_time: vpc.creation_time.clone(),
            resource_group_id: vpc.resource_group_id.clone(),
            dhcp_options_set_id: vpc.dhcp_options_set_id.clone(),
            tags: tags_map(&vpc.tags),
        }
    }
}

#[derive(Debug, Default)]
pub struct VpcsDataSource;

impl VpcsDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for VpcsDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, client: &Client, config: Value) -> Result<DataSourceState, DataSourceError> {
        let args: VpcsArgs = parse_args(TYPE_NAME, config)?;
        let filter = filter_spec(args.name_regex.as_deref(), args.ids.as_deref())?;

        let lister = RpcLister::new(client.clone(), args.request());
        let outcome = list_filter_project(&lister, &filter, |vpc: &Vpc| VpcRecord::from(vpc)).await?;

        finish(TYPE_NAME, "vpcs", outcome, args.output_file.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn args_map_to_server_side_filters() {
        let args: VpcsArgs = parse_args(
            TYPE_NAME,
            json!({"name_regex": "^prod", "is_default": false, "dhcp_options_set_id": "dopt-1"}),
        )
        .unwrap();
        let params = args.request().params();
        assert_eq!(params.get("IsDefault"), Some("false"));
        assert_eq!(params.get("DhcpOptionsSetId"), Some("dopt-1"));
        assert_eq!(params.get("VpcName"), None);
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        let err = parse_args::<VpcsArgs>(TYPE_NAME, json!({"status": "Available"})).unwrap_err();
        assert!(err.to_string().contains("alicloud_vpcs"));
    }

    #[test]
    fn record_flattens_tags() {
        let vpc: Vpc = serde_json::from_value(json!({
            "VpcId": "vpc-1",
            "VpcName": "main",
            "Tags": {"Tag": [{"Key": "b", "Value": "2"}, {"Key": "a", "Value": "1"}]}
        }))
        .unwrap();
        let record = VpcRecord::from(&vpc);
        assert_eq!(record.id, "vpc-1");
        assert_eq!(
            serde_json::to_value(&record.tags).unwrap(),
            json!({"a": "1", "b": "2"})
        );
    }
}
