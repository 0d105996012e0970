//! VPC product: VPCs, vSwitches and route entries

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

pub const DESCRIBE_VPCS: &str = "DescribeVpcs";
pub const DESCRIBE_VSWITCHES: &str = "DescribeVSwitches";
pub const DESCRIBE_ROUTE_ENTRY_LIST: &str = "DescribeRouteEntryList";

/// VPC API
pub struct VpcApi<'a> {
    client: &'a Client,
}

impl<'a> VpcApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// One page of `DescribeVpcs`
    pub async fn describe_vpcs(
        &self,
        request: &DescribeVpcsRequest,
        cursor: &PageCursor,
    ) -> Result<Value, ApiError> {
        let params = request
            .params()
            .extend(&page_params(request.pagination(), cursor, "PageSize"));
        self.client
            .do_request(Product::Vpc, DESCRIBE_VPCS, &params)
            .await
    }

    /// One page of `DescribeVSwitches`
    pub async fn describe_vswitches(
        &self,
        request: &DescribeVSwitchesRequest,
        cursor: &PageCursor,
    ) -> Result<Value, ApiError> {
        let params = request
            .params()
            .extend(&page_params(request.pagination(), cursor, "PageSize"));
        self.client
            .do_request(Product::Vpc, DESCRIBE_VSWITCHES, &params)
            .await
    }

    /// One page of `DescribeRouteEntryList`, token paginated
    pub async fn describe_route_entry_list(
        &self,
        request: &DescribeRouteEntryListRequest,
        cursor: &PageCursor,
    ) -> Result<Value, ApiError> {
        let params = request
            .params()
            .extend(&page_params(request.pagination(), cursor, "MaxResult"));
        self.client
            .do_request(Product::Vpc, DESCRIBE_ROUTE_ENTRY_LIST, &params)
            .await
    }
}

// VPCs

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeVpcsRequest {
    pub vpc_name: Option<String>,
    pub is_default: Option<bool>,
    pub resource_group_id: Option<String>,
    pub dhcp_options_set_id: Option<String>,
    pub page_size: u32,
}

impl Default for DescribeVpcsRequest {
    fn default() -> Self {
        Self {
            vpc_name: None,
            is_default: None,
            resource_group_id: None,
            dhcp_options_set_id: None,
            page_size: PAGE_SIZE_LARGE,
        }
    }
}

impl DescribeVpcsRequest {
    pub fn params(&self) -> RpcParams {
        RpcParams::new()
            .add_non_empty("VpcName", self.vpc_name.as_deref())
            .add_optional("IsDefault", self.is_default)
            .add_non_empty("ResourceGroupId", self.resource_group_id.as_deref())
            .add_non_empty("DhcpOptionsSetId", self.dhcp_options_set_id.as_deref())
    }
}

#[async_trait]
impl ListAction for DescribeVpcsRequest {
    type Item = Vpc;
    const ITEMS_PATH: &'static str = "$.Vpcs.Vpc";

    fn action(&self) -> &'static str {
        DESCRIBE_VPCS
    }

    fn pagination(&self) -> Pagination {
        Pagination::page_number(self.page_size)
    }

    async fn fetch(&self, client: &Client, cursor: &PageCursor) -> Result<Value, ApiError> {
        client.vpc().describe_vpcs(self, cursor).await
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Vpc {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub vpc_id: String,
    #[serde(default)]
    pub vpc_name: String,
    #[serde(default)]
    pub cidr_block: String,
    #[serde(default)]
    pub ipv6_cidr_block: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub region_id: String,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub is_default: bool,
    #[serde(default)]
    pub creation_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "VRouterId", default)]
    pub vrouter_id: String,
    #[serde(rename = "VSwitchIds", default, deserialize_with = "nested_list::deserialize")]
    pub vswitch_ids: Vec<String>,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub user_cidrs: Vec<String>,
    #[serde(default)]
    pub resource_group_id: String,
    #[serde(default)]
    pub dhcp_options_set_id: String,
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub owner_id: Option<u64>,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub tags: Vec<Tag>,
}

impl Listed for Vpc {
    fn id(&self) -> String {
        self.vpc_id.clone()
    }

    fn name(&self) -> Option<&str> {
        Some(&self.vpc_name)
    }
}

// vSwitches

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeVSwitchesRequest {
    pub vpc_id: Option<String>,
    pub zone_id: Option<String>,
    pub is_default: Option<bool>,
    pub resource_group_id: Option<String>,
    pub page_size: u32,
}

impl Default for DescribeVSwitchesRequest {
    fn default() -> Self {
        Self {
            vpc_id: None,
            zone_id: None,
            is_default: None,
            resource_group_id: None,
            page_size: PAGE_SIZE_LARGE,
        }
    }
}

impl DescribeVSwitchesRequest {
    pub fn params(&self) -> RpcParams {
        RpcParams::new()
            .add_non_empty("VpcId", self.vpc_id.as_deref())
            .add_non_empty("ZoneId", self.zone_id.as_deref())
            .add_optional("IsDefault", self.is_default)
            .add_non_empty("ResourceGroupId", self.resource_group_id.as_deref())
    }
}

#[async_trait]
impl ListAction for DescribeVSwitchesRequest {
    type Item = VSwitch;
    const ITEMS_PATH: &'static str = "$.VSwitches.VSwitch";

    fn action(&self) -> &'static str {
        DESCRIBE_VSWITCHES
    }

    fn pagination(&self) -> Pagination {
        Pagination::page_number(self.page_size)
    }

    async fn fetch(&self, client: &Client, cursor: &PageCursor) -> Result<Value, ApiError> {
        client.vpc().describe_vswitches(self, cursor).await
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct VSwitch {
    #[serde(rename = "VSwitchId", deserialize_with = "string_or_number::deserialize")]
    pub vswitch_id: String,
    #[serde(rename = "VSwitchName", default)]
    pub vswitch_name: String,
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub cidr_block: String,
    #[serde(default)]
    pub ipv6_cidr_block: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub is_default: bool,
    #[serde(default)]
    pub creation_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub available_ip_address_count: Option<u64>,
    #[serde(default)]
    pub resource_group_id: String,
    #[serde(default)]
    pub network_acl_id: String,
    #[serde(default)]
    pub route_table: RouteTableRef,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableRef {
    #[serde(default)]
    pub route_table_id: String,
    #[serde(default)]
    pub route_table_type: String,
}

impl Listed for VSwitch {
    fn id(&self) -> String {
        self.vswitch_id.clone()
    }

    fn name(&self) -> Option<&str> {
        Some(&self.vswitch_name)
    }
}

// Route entries

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeRouteEntryListRequest {
    pub route_table_id: String,
    pub destination_cidr_block: Option<String>,
    pub next_hop_id: Option<String>,
    pub route_entry_type: Option<String>,
    pub max_results: u32,
}

impl DescribeRouteEntryListRequest {
    pub fn new(route_table_id: impl Into<String>) -> Self {
        Self {
            route_table_id: route_table_id.into(),
            destination_cidr_block: None,
            next_hop_id: None,
            route_entry_type: None,
            max_results: PAGE_SIZE_LARGE,
        }
    }

    pub fn params(&self) -> RpcParams {
        RpcParams::new()
            .add("RouteTableId", &self.route_table_id)
            .add_non_empty("DestinationCidrBlock", self.destination_cidr_block.as_deref())
            .add_non_empty("NextHopId", self.next_hop_id.as_deref())
            .add_non_empty("RouteEntryType", self.route_entry_type.as_deref())
    }
}

#[async_trait]
impl ListAction for DescribeRouteEntryListRequest {
    type Item = RouteEntry;
    const ITEMS_PATH: &'static str = "$.RouteEntrys.RouteEntry";

    fn action(&self) -> &'static str {
        DESCRIBE_ROUTE_ENTRY_LIST
    }

    fn pagination(&self) -> Pagination {
        Pagination::next_token(self.max_results)
    }

    async fn fetch(&self, client: &Client, cursor: &PageCursor) -> Result<Value, ApiError> {
        client.vpc().describe_route_entry_list(self, cursor).await
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RouteEntry {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub route_table_id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub route_entry_id: String,
    #[serde(default)]
    pub route_entry_name: String,
    #[serde(default)]
    pub destination_cidr_block: String,
    #[serde(rename = "Type", default)]
    pub entry_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ip_version: String,
    #[serde(default, deserialize_with = "nested_list::deserialize")]
    pub next_hops: Vec<NextHop>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NextHop {
    #[serde(default)]
    pub next_hop_type: String,
    #[serde(default)]
    pub next_hop_id: String,
    #[serde(default, deserialize_with = "lenient_u64::deserialize")]
    pub weight: Option<u64>,
}

impl Listed for RouteEntry {
    /// Route entry ids are only unique within their table
    fn id(&self) -> String {
        format!("{}:{}", self.route_table_id, self.route_entry_id)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.route_entry_name)
    }
}
