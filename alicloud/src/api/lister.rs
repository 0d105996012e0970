//! Paginated RPC list actions as [`BackendLister`]s
//!
//! A [`ListAction`] is a typed request for one listing action: it knows its
//! pagination policy, where the items live in the response and how to fetch
//! a single page. [`RpcLister`] adapts any of them to
//! [`tflist::list_filter_project`], turning transport failures into
//! [`ListError::Backend`] and decoding items through [`tflist::extract`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tflist::{extract, BackendLister, ListError, Listed, Page, PageCursor, Pagination};

use super::client::Client;
use super::common::RpcParams;
use super::error::ApiError;

#[async_trait]
pub trait ListAction: Send + Sync {
    type Item: DeserializeOwned + Listed + Send;

    /// Path of the item array inside a response, e.g. `$.Vpcs.Vpc`
    const ITEMS_PATH: &'static str;

    fn action(&self) -> &'static str;

    fn pagination(&self) -> Pagination;

    /// Fetch the raw response for one page
    async fn fetch(&self, client: &Client, cursor: &PageCursor) -> Result<Value, ApiError>;
}

/// Paging parameters for `cursor`.
///
/// `size_key` differs between actions (`PageSize`, `MaxResults`, `MaxResult`).
pub fn page_params(pagination: Pagination, cursor: &PageCursor, size_key: &str) -> RpcParams {
    let size = pagination.page_size();
    match cursor {
        PageCursor::Number(number) => RpcParams::new()
            .add("PageNumber", number)
            .add(size_key, size),
        PageCursor::Token(token) => RpcParams::new()
            .add(size_key, size)
            .add_optional("NextToken", token.as_deref()),
    }
}

/// [`BackendLister`] over a typed list request
pub struct RpcLister<A> {
    client: Client,
    request: A,
}

impl<A: ListAction> RpcLister<A> {
    pub fn new(client: Client, request: A) -> Self {
        Self { client, request }
    }
}

#[async_trait]
impl<A: ListAction> BackendLister for RpcLister<A> {
    type Item = A::Item;

    fn action(&self) -> &str {
        self.request.action()
    }

    fn pagination(&self) -> Pagination {
        self.request.pagination()
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> tflist::Result<Page<A::Item>> {
        let response = self
            .request
            .fetch(&self.client, cursor)
            .await
            .map_err(|e| ListError::backend(self.request.action(), e))?;

        let items = extract::items::<A::Item>(&response, A::ITEMS_PATH)?;
        if let Some(total) = extract::total_count(&response) {
            tracing::debug!(
                "{} {}: backend reports {} in total",
                self.request.action(),
                cursor,
                total
            );
        }
        Ok(Page::new(items).with_next_token(extract::next_token(&response)))
    }
}
