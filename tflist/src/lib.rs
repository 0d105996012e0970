//! tflist - paginated list, filter and project for Terraform data sources
//!
//! Data sources that enumerate a remote collection all follow one shape:
//! page through a listing API, keep the items whose name matches a regex
//! and whose id is in a configured set, project each kept item into a flat
//! record, and derive a stable identifier for the whole result. This crate
//! implements that shape once; callers supply a [`BackendLister`] for the
//! API and a projection closure for the record.

// Core modules
pub mod error;
pub mod filter;
pub mod pagination;

// Listing
pub mod hash;
pub mod list;
pub mod lister;

// Decode boundary
pub mod extract;
pub mod value;

// Re-exports for convenience
pub use error::{ListError, Result};
pub use filter::FilterSpec;
pub use hash::result_id_hash;
pub use list::{list_filter_project, ListOutcome};
pub use lister::{BackendLister, Listed};
pub use pagination::{
    Page, PageCursor, Pagination, PAGE_SIZE_LARGE, PAGE_SIZE_MEDIUM, PAGE_SIZE_SMALL,
    PAGE_SIZE_XLARGE,
};
