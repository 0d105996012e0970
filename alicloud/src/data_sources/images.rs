//! `alicloud_images` data source
//!
//! Matches are returned newest first by `CreationTime`; with `most_recent`
//! only the newest match is kept. The result id follows that order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tflist::{list_filter_project, ListOutcome};

use super::{filter_spec, finish, parse_args, tags_map, DataSource, DataSourceError, DataSourceState};
use crate::api::ecs::{DescribeImagesRequest, DiskDeviceMapping, Image};
use crate::api::{Client, RpcLister};

pub const TYPE_NAME: &str = "alicloud_images";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagesArgs {
    pub name_regex: Option<String>,
    pub ids: Option<Vec<String>>,
    /// `system`, `self`, `others` or `marketplace`
    pub owners: Option<String>,
    pub status: Option<String>,
    pub architecture: Option<String>,
    #[serde(default)]
    pub most_recent: bool,
    pub output_file: Option<String>,
}

impl ImagesArgs {
    fn request(&self) -> DescribeImagesRequest {
        DescribeImagesRequest {
            owners: self.owners.clone(),
            status: self.status.clone(),
            architecture: self.architecture.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiskMappingRecord {
    pub device: String,
    pub size: String,
    pub snapshot_id: String,
}

impl From<&DiskDeviceMapping> for DiskMappingRecord {
    fn from(mapping: &DiskDeviceMapping) -> Self {
        Self {
            device: mapping.device.clone(),
            size: mapping.size.clone(),
            snapshot_id: mapping.snapshot_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    pub image_id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub architecture: String,
    pub os_type: String,
    pub os_name: String,
    pub os_name_en: String,
    pub platform: String,
    pub size: Option<u64>,
    pub creation_time: String,
    pub image_owner_alias: String,
    pub image_version: String,
    pub progress: String,
    pub usage: String,
    pub product_code: String,
    pub is_support_io_optimized: bool,
    pub is_copied: bool,
    pub is_self_shared: bool,
    pub is_subscribed: bool,
    pub disk_device_mappings: Vec<DiskMappingRecord>,
    pub tags: BTreeMap<String, String>,
}

impl From<&Image> for ImageRecord {
    fn from(image: &Image) -> Self {
        Self {
            id: image.image_id.clone(),
            image_id: image.image_id.clone(),
            name: image.image_name.clone(),
            description: image.description.clone(),
            status: image.status.clone(),
            architecture: image.architecture.clone(),
            os_type: image.os_type.clone(),
            os_name: image.os_name.clone(),
            os_name_en: image.os_name_en.clone(),
            platform: image.platform.clone(),
            size: image.size,
            creation_time: image.creation_time.clone(),
            image_owner_alias: image.image_owner_alias.clone(),
            image_version: image.image_version.clone(),
            progress: image.progress.clone(),
            usage: image.usage.clone(),
            product_code: image.product_code.clone(),
            is_support_io_optimized: image.is_support_io_optimized,
            is_copied: image.is_copied,
            is_self_shared: image.is_self_shared,
            is_subscribed: image.is_subscribed,
            disk_device_mappings: image
                .disk_device_mappings
                .iter()
                .map(DiskMappingRecord::from)
                .collect(),
            tags: tags_map(&image.tags),
        }
    }
}

/// Newest first; equal timestamps keep backend order.
/// `CreationTime` is ISO 8601 UTC, so string order is time order.
fn order_newest_first(outcome: &mut ListOutcome<ImageRecord>, most_recent: bool) {
    outcome.sort_by_key(|image| Reverse(image.creation_time.clone()));
    if most_recent {
        outcome.retain_first(1);
    }
}

#[derive(Debug, Default)]
pub struct ImagesDataSource;

impl ImagesDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for ImagesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, client: &Client, config: Value) -> Result<DataSourceState, DataSourceError> {
        let args: ImagesArgs = parse_args(TYPE_NAME, config)?;
        let filter = filter_spec(args.name_regex.as_deref(), args.ids.as_deref())?;

        let lister = RpcLister::new(client.clone(), args.request());
        let mut outcome =
            list_filter_project(&lister, &filter, |image: &Image| ImageRecord::from(image)).await?;
        order_newest_first(&mut outcome, args.most_recent);

        finish(TYPE_NAME, "images", outcome, args.output_file.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tflist::{BackendLister, FilterSpec, Page, PageCursor, Pagination};

    struct Catalog(Vec<Image>);

    #[async_trait]
    impl BackendLister for Catalog {
        type Item = Image;

        fn action(&self) -> &str {
            "DescribeImages"
        }

        fn pagination(&self) -> Pagination {
            Pagination::page_number(50)
        }

        async fn fetch_page(&self, _cursor: &PageCursor) -> tflist::Result<Page<Image>> {
            Ok(Page::new(self.0.clone()))
        }
    }

    fn image(id: &str, created: &str) -> Image {
        serde_json::from_value(json!({
            "ImageId": id,
            "ImageName": format!("name-{id}"),
            "CreationTime": created
        }))
        .unwrap()
    }

    async fn listed(most_recent: bool) -> ListOutcome<ImageRecord> {
        let catalog = Catalog(vec![
            image("m-old", "2021-01-01T00:00:00Z"),
            image("m-new", "2023-06-01T00:00:00Z"),
            image("m-mid", "2022-03-01T00:00:00Z"),
            image("m-mid2", "2022-03-01T00:00:00Z"),
        ]);
        let mut outcome = list_filter_project(&catalog, &FilterSpec::none(), |i: &Image| {
            ImageRecord::from(i)
        })
        .await
        .unwrap();
        order_newest_first(&mut outcome, most_recent);
        outcome
    }

    #[tokio::test]
    async fn images_are_sorted_newest_first() {
        let outcome = listed(false).await;
        assert_eq!(outcome.ids(), vec!["m-new", "m-mid", "m-mid2", "m-old"]);
        assert_eq!(
            outcome.names(),
            vec!["name-m-new", "name-m-mid", "name-m-mid2", "name-m-old"]
        );
    }

    #[tokio::test]
    async fn most_recent_keeps_one() {
        let outcome = listed(true).await;
        assert_eq!(outcome.ids(), vec!["m-new"]);
        assert_eq!(outcome.result_id(), tflist::result_id_hash(["m-new"]));
    }

    #[test]
    fn owners_map_to_owner_alias() {
        let args: ImagesArgs =
            parse_args(TYPE_NAME, json!({"owners": "system", "most_recent": true})).unwrap();
        assert!(args.most_recent);
        assert_eq!(args.request().params().get("ImageOwnerAlias"), Some("system"));
    }
}
