//! Pagination policies for listing APIs
//!
//! Listing APIs terminate in one of two ways: page-number APIs return a
//! short page, token APIs stop returning a next token. Which one applies is
//! a property of the backend action, so the policy is chosen explicitly by
//! each lister rather than inferred from the response.

use crate::error::{ListError, Result};

pub const PAGE_SIZE_SMALL: u32 = 10;
pub const PAGE_SIZE_MEDIUM: u32 = 20;
pub const PAGE_SIZE_LARGE: u32 = 50;
pub const PAGE_SIZE_XLARGE: u32 = 100;

/// Termination policy for a listing loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `PageNumber`/`PageSize` APIs: a page shorter than `page_size` is the last one
    PageNumber { page_size: u32 },
    /// `NextToken`/`MaxResults` APIs: a response without a token is the last one
    NextToken { max_results: u32 },
}

/// Position of the next page to request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    Number(u32),
    Token(Option<String>),
}

/// One page of decoded items
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    pub fn with_next_token(mut self, token: Option<String>) -> Self {
        self.next_token = token.filter(|t| !t.is_empty());
        self
    }
}

impl Pagination {
    pub fn page_number(page_size: u32) -> Self {
        Pagination::PageNumber { page_size }
    }

    pub fn next_token(max_results: u32) -> Self {
        Pagination::NextToken { max_results }
    }

    /// Number of items requested per call
    pub fn page_size(&self) -> u32 {
        match self {
            Pagination::PageNumber { page_size } => *page_size,
            Pagination::NextToken { max_results } => *max_results,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size() == 0 {
            return Err(ListError::InvalidPageSize);
        }
        Ok(())
    }

    pub fn first_cursor(&self) -> PageCursor {
        match self {
            Pagination::PageNumber { .. } => PageCursor::Number(1),
            Pagination::NextToken { .. } => PageCursor::Token(None),
        }
    }

    /// Cursor for the page after `page`, or `None` when listing is complete.
    ///
    /// Never looks at how many items survived filtering.
    pub fn next_cursor<T>(&self, current: &PageCursor, page: &Page<T>) -> Option<PageCursor> {
        match self {
            Pagination::PageNumber { page_size } => {
                if page.items.len() < *page_size as usize {
                    return None;
                }
                match current {
                    PageCursor::Number(n) => Some(PageCursor::Number(n + 1)),
                    PageCursor::Token(_) => Some(PageCursor::Number(2)),
                }
            }
            Pagination::NextToken { .. } => page
                .next_token
                .as_ref()
                .filter(|t| !t.is_empty())
                .map(|t| PageCursor::Token(Some(t.clone()))),
        }
    }
}

impl PageCursor {
    pub fn page_number(&self) -> Option<u32> {
        match self {
            PageCursor::Number(n) => Some(*n),
            PageCursor::Token(_) => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            PageCursor::Token(t) => t.as_deref(),
            PageCursor::Number(_) => None,
        }
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageCursor::Number(n) => write!(f, "page {}", n),
            PageCursor::Token(Some(t)) => write!(f, "token {}", t),
            PageCursor::Token(None) => write!(f, "first token page"),
        }
    }
}
