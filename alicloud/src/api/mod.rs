//! Alibaba Cloud RPC API client
//!
//! [`Client::do_request`] issues one RPC-style call (action name plus query
//! parameters, JSON body back) with retry and backoff for throttling and
//! transient failures. Per-product modules define typed list requests and
//! the items they return.

pub mod client;
pub mod common;
pub mod ecs;
pub mod endpoint;
pub mod error;
pub mod lister;
pub mod pool;
pub mod vpc;

#[cfg(test)]
mod test_helpers;

pub use client::{Client, ClientConfig, Credentials, RetryConfig};
pub use common::{RpcParams, Tag};
pub use endpoint::{Endpoints, Product};
pub use error::ApiError;
pub use lister::{ListAction, RpcLister};
