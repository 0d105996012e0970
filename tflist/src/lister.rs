//! BackendLister trait and related types
//!
//! This module defines the collaborator a listing data source hands to
//! [`crate::list_filter_project`]: one call per page, nothing else.

use crate::error::Result;
use crate::pagination::{Page, PageCursor, Pagination};
use async_trait::async_trait;

/// An item that can be filtered by id and name
pub trait Listed {
    /// Designated id. Composite ids (`parent:child`) are returned here as-is
    /// so the `ids` filter and the result hash see the same value.
    fn id(&self) -> String;

    /// Designated name-like field, if the resource kind has one
    fn name(&self) -> Option<&str> {
        None
    }
}

/// A paginated listing API
#[async_trait]
pub trait BackendLister: Send + Sync {
    type Item: Listed + Send;

    /// API action name, used in error context and logs
    fn action(&self) -> &str;

    /// Termination policy of this action
    fn pagination(&self) -> Pagination;

    /// Issue one listing call at `cursor`.
    /// Server-side filters are part of the lister's own request parameters.
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<Page<Self::Item>>;
}
