//! `alicloud_instances` data source

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tflist::list_filter_project;

use super::{filter_spec, finish, parse_args, tags_map, DataSource, DataSourceError, DataSourceState};
use crate::api::ecs::{DescribeInstancesRequest, Instance};
use crate::api::{Client, RpcLister};

pub const TYPE_NAME: &str = "alicloud_instances";

/// Upper bound of `InstanceIds` accepted by DescribeInstances
const MAX_INSTANCE_IDS: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstancesArgs {
    pub name_regex: Option<String>,
    pub ids: Option<Vec<String>>,
    pub status: Option<String>,
    pub vpc_id: Option<String>,
    pub vswitch_id: Option<String>,
    pub availability_zone: Option<String>,
    pub image_id: Option<String>,
    pub resource_group_id: Option<String>,
    pub output_file: Option<String>,
}

impl InstancesArgs {
    fn request(&self) -> DescribeInstancesRequest {
        // The ids filter still runs client-side; this only narrows the listing
        let instance_ids = self
            .ids
            .clone()
            .filter(|ids| ids.len() <= MAX_INSTANCE_IDS)
            .unwrap_or_default();

        DescribeInstancesRequest {
            status: self.status.clone(),
            vpc_id: self.vpc_id.clone(),
            vswitch_id: self.vswitch_id.clone(),
            zone_id: self.availability_zone.clone(),
            image_id: self.image_id.clone(),
            resource_group_id: self.resource_group_id.clone(),
            instance_ids,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstanceRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub region_id: String,
    pub availability_zone: String,
    pub instance_type: String,
    pub image_id: String,
    pub host_name: String,
    pub cpu: Option<u64>,
    pub memory: Option<u64>,
    pub vpc_id: String,
    pub vswitch_id: String,
    pub private_ip: String,
    pub public_ip: String,
    pub eip: String,
    pub security_groups: Vec<String>,
    pub key_name: String,
    pub creation_time: String,
    pub instance_charge_type: String,
    pub internet_charge_type: String,
    pub internet_max_bandwidth_out: Option<u64>,
    pub resource_group_id: String,
    pub os_type: String,
    pub tags: BTreeMap<String, String>,
}

impl From<&Instance> for InstanceRecord {
    fn from(instance: &Instance) -> Self {
        Self {
            id: instance.instance_id.clone(),
            name: instance.instance_name.clone(),
            description: instance.description.clone(),
            status: instance.status.clone(),
            region_id: instance.region_id.clone(),
            availability_zone: instance.zone_id.clone(),
            instance_type: instance.instance_type.clone(),
            image_id: instance.image_id.clone(),
            host_name: instance.host_name.clone(),
            cpu: instance.cpu,
            memory: instance.memory,
            vpc_id: instance.vpc_attributes.vpc_id.clone(),
            vswitch_id: instance.vpc_attributes.vswitch_id.clone(),
            private_ip: instance.private_ip().unwrap_or_default().to_string(),
            public_ip: instance.public_ip().unwrap_or_default().to_string(),
            eip: instance.eip_address.ip_address.clone(),
            security_groups: instance.security_group_ids.clone(),
            key_name: instance.key_pair_name.clone(),
            creation_time: instance.creation_time.clone(),
            instance_charge_type: instance.instance_charge_type.clone(),
            internet_charge_type: instance.internet_charge_type.clone(),
            internet_max_bandwidth_out: instance.internet_max_bandwidth_out,
            resource_group_id: instance.resource_group_id.clone(),
            os_type: instance.os_type.clone(),
            tags: tags_map(&instance.tags),
        }
    }
}

#[derive(Debug, Default)]
pub struct InstancesDataSource;

impl InstancesDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for InstancesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, client: &Client, config: Value) -> Result<DataSourceState, DataSourceError> {
        let args: InstancesArgs = parse_args(TYPE_NAME, config)?;
        let filter = filter_spec(args.name_regex.as_deref(), args.ids.as_deref())?;

        let lister = RpcLister::new(client.clone(), args.request());
        let outcome = list_filter_project(&lister, &filter, |instance: &Instance| {
            InstanceRecord::from(instance)
        })
        .await?;

        finish(TYPE_NAME, "instances", outcome, args.output_file.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_narrow_the_request() {
        let args: InstancesArgs = parse_args(
            TYPE_NAME,
            json!({"ids": ["i-1", "i-2"], "availability_zone": "cn-hangzhou-i"}),
        )
        .unwrap();
        let request = args.request();
        assert_eq!(request.instance_ids, vec!["i-1", "i-2"]);
        assert_eq!(request.zone_id.as_deref(), Some("cn-hangzhou-i"));
    }

    #[test]
    fn too_many_ids_are_filtered_client_side_only() {
        let ids: Vec<String> = (0..150).map(|i| format!("i-{i}")).collect();
        let args = InstancesArgs {
            ids: Some(ids),
            ..Default::default()
        };
        assert!(args.request().instance_ids.is_empty());
    }

    #[test]
    fn record_uses_vpc_attributes() {
        let instance: Instance = serde_json::from_value(json!({
            "InstanceId": "i-1",
            "InstanceName": "web",
            "ZoneId": "cn-hangzhou-i",
            "KeyPairName": "deploy",
            "VpcAttributes": {
                "VpcId": "vpc-1",
                "VSwitchId": "vsw-1",
                "PrivateIpAddress": {"IpAddress": ["10.0.0.5"]}
            },
            "SecurityGroupIds": {"SecurityGroupId": ["sg-1", "sg-2"]}
        }))
        .unwrap();

        let record = InstanceRecord::from(&instance);
        assert_eq!(record.availability_zone, "cn-hangzhou-i");
        assert_eq!(record.private_ip, "10.0.0.5");
        assert_eq!(record.public_ip, "");
        assert_eq!(record.key_name, "deploy");
        assert_eq!(record.security_groups, vec!["sg-1", "sg-2"]);
    }
}
