//! ECS product: instances and images

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tflist::value::{lenient_bool, lenient_u64, nested_list, string_or_number};
use tflist::{Listed, PageCursor, Pagination, PAGE_SIZE_LARGE};

use super::client::Client;
use super::common::{RpcParams, Tag};
use super::endpoint::Product;
use super::error::ApiError;
use super::lister::{page_params, ListAction};

pub const DESCRIBE_INSTANCES: &str = "DescribeInstances";
pub const DESCRIBE_IMAGES: &str = "DescribeImages";

/// ECS API
pub struct EcsApi<'a> {
    client: &'a Client,
}

impl<'a> EcsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn describe_instances(
        &self,
        request: &DescribeInstancesRequest,
        cursor: &PageCursor,
    ) -> Result<Value, ApiError> {
        let params = request
            .params()
            .extend(&page_params(request.pagination(), cursor, "PageSize"));
        self.client
            .do_request(Product::Ecs, DESCRIBE_INSTANCES, &params)
            .await
    }

    pub async fn describe_images(
        &self,
        request: &DescribeImagesRequest,
        cursor: &PageCursor,
    ) -> Result<Value, ApiError> {
        let params = request
            .params()
            .extend(&page_params(request.pagination(), cursor, "PageSize"));
        self.client
            .do_request(Product::Ecs, DESCRIBE_IMAGES, &params)
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeInstancesRequest {
    pub status: Option<String>,
    pub vpc_id: Option<String>,
    pub vswitch_id: Option<String>,
    pub zone_id: Option<String>,
    pub image_id: Option<String>,
    pub resource_group_id: Option<String>,
    /// Sent as a JSON array; at most 100 ids are accepted by the service
    pub instance_ids: Vec<String>,
    pub page_size: u32,
}

impl Default for DescribeInstancesRequest {
    fn default() -> Self {
        Self {
            status: None,
            vpc_id: None,
            vswitch_id: None,
            zone_id: None,
            image_id: None,
            resource_group_id: None,
            instance_ids: Vec::new(),
            page_size: PAGE_SIZE_LARGE,
        }
    }
}

impl DescribeInstancesRequest {
    pub fn params(&self) -> RpcParams {
        let instance_ids = (!self.instance_ids.is_empty())
            .then(|| Value::from(self.instance_ids.clone()).to_string());

        RpcParams::new()
            .add_non_empty("Status", self.status.as_deref())
            .add_non_empty("VpcId", self.vpc_id.as_deref())
            .add_non_empty("VSwitchId", self.vswitch_id.as_deref())
            .add_non_empty("ZoneId", self.zone_id.as_deref())
            .add_non_empty("ImageId", self.image_id.as_deref())
            .add_non_empty("ResourceGroupId", self.resource_group_id.as_deref())
            .add_optional("InstanceIds", instance_ids)
    }
}

#[async_trait]
impl ListAction for DescribeInstancesRequest {
    type Item = Instance;
    const ITEMS_PATH: &'static str = "$.Instances.Instance";

    fn action(&self) -> &'static str {
        DESCRIBE_INSTANCES
    }

    fn pagination(&self) -> Pagination {
        Pagination::page_number(self.page_size)
    }

    async fn fetch(&self, client: &Client, cursor: &PageCursor) -> Result<Value, ApiError> {
        client.ecs().describe_instances(self, cursor).await
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub instance_id: String,
    #[serde(default)]
    pub instance_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub region_id: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub image_id: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub cpu: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub memory: Option<u64>,
    #[serde(default)]
    pub creation_time: String,
    #[serde(default)]
    pub expired_time: String,
    #[serde(default)]
    pub instance_charge_type: String,
    #[serde(default)]
    pub internet_charge_type: String,
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub internet_max_bandwidth_out: Option<u64>,
    #[serde(default)]
    pub resource_group_id: String,
    #[serde(default)]
    pub key_pair_name: String,
    #[serde(rename = "OSType", default)]
    pub os_type: String,
    #[serde(rename = "OSName", default)]
    pub os_name: String,
    #[serde(default)]
    pub vpc_attributes: VpcAttributes,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub public_ip_address: Vec<String>,
    #[serde(default)]
    pub eip_address: EipAddress,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub security_group_ids: Vec<String>,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VpcAttributes {
    #[serde(default)]
    pub vpc_id: String,
    #[serde(rename = "VSwitchId", default)]
    pub vswitch_id: String,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub private_ip_address: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct EipAddress {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub allocation_id: String,
}

impl Instance {
    /// Private address inside the VPC, if assigned
    pub fn private_ip(&self) -> Option<&str> {
        self.vpc_attributes
            .private_ip_address
            .first()
            .map(String::as_str)
    }

    /// Public address: a classic public IP, falling back to a bound EIP
    pub fn public_ip(&self) -> Option<&str> {
        self.public_ip_address
            .first()
            .map(String::as_str)
            .or_else(|| Some(self.eip_address.ip_address.as_str()).filter(|ip| !ip.is_empty()))
    }
}

impl Listed for Instance {
    fn id(&self) -> String {
        self.instance_id.clone()
    }

    fn name(&self) -> Option<&str> {
        Some(&self.instance_name)
    }
}

// Images

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeImagesRequest {
    /// `ImageOwnerAlias`: system, self, others, marketplace
    pub owners: Option<String>,
    pub status: Option<String>,
    pub architecture: Option<String>,
    pub page_size: u32,
}

impl Default for DescribeImagesRequest {
    fn default() -> Self {
        Self {
            owners: None,
            status: None,
            architecture: None,
            page_size: PAGE_SIZE_LARGE,
        }
    }
}

impl DescribeImagesRequest {
    pub fn params(&self) -> RpcParams {
        RpcParams::new()
            .add_non_empty("ImageOwnerAlias", self.owners.as_deref())
            .add_non_empty("Status", self.status.as_deref())
            .add_non_empty("Architecture", self.architecture.as_deref())
    }
}

#[async_trait]
impl ListAction for DescribeImagesRequest {
    type Item = Image;
    const ITEMS_PATH: &'static str = "$.Images.Image";

    fn action(&self) -> &'static str {
        DESCRIBE_IMAGES
    }

    fn pagination(&self) -> Pagination {
        Pagination::page_number(self.page_size)
    }

    async fn fetch(&self, client: &Client, cursor: &PageCursor) -> Result<Value, ApiError> {
        client.ecs().describe_images(self, cursor).await
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub image_id: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(rename = "OSType", default)]
    pub os_type: String,
    #[serde(rename = "OSName", default)]
    pub os_name: String,
    #[serde(rename = "OSNameEn", default)]
    pub os_name_en: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub size: Option<u64>,
    #[serde(default)]
    pub creation_time: String,
    #[serde(default)]
    pub image_owner_alias: String,
    #[serde(default)]
    pub image_version: String,
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub is_support_io_optimized: bool,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub is_copied: bool,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub is_self_shared: bool,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub is_subscribed: bool,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub disk_device_mappings: Vec<DiskDeviceMapping>,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DiskDeviceMapping {
    #[serde(default)]
    pub device: String,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub size: String,
    #[serde(default)]
    pub snapshot_id: String,
    #[serde(rename = "Type", default)]
    pub disk_type: String,
}

impl Listed for Image {
    fn id(&self) -> String {
        self.image_id.clone()
    }

    fn name(&self) -> Option<&str> {
        Some(&self.image_name)
    }
}
