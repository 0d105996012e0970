//! Product catalogue and endpoint resolution

use std::collections::HashMap;
use std::fmt;
use url::Url;

use super::error::ApiError;

/// Cloud product an RPC action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Vpc,
    Ecs,
}

impl Product {
    pub const ALL: [Product; 2] = [Product::Vpc, Product::Ecs];

    pub fn code(&self) -> &'static str {
        match self {
            Product::Vpc => "vpc",
            Product::Ecs => "ecs",
        }
    }

    /// API version sent with every action of this product
    pub fn api_version(&self) -> &'static str {
        match self {
            Product::Vpc => "2016-04-28",
            Product::Ecs => "2014-05-26",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Endpoint overrides keyed by product
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    overrides: HashMap<Product, String>,
}

impl Endpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, product: Product, endpoint: impl Into<String>) -> Self {
        self.overrides.insert(product, endpoint.into());
        self
    }

    pub fn is_overridden(&self, product: Product) -> bool {
        self.overrides.contains_key(&product)
    }

    /// Base URL for `product` in `region`, without a trailing slash
    pub fn resolve(&self, product: Product, region: &str) -> Result<String, ApiError> {
        let raw = match self.overrides.get(&product) {
            Some(endpoint) => endpoint.clone(),
            None => format!("{}.{}.aliyuncs.com", product.code(), region),
        };

        let with_scheme = if raw.contains("://") {
            raw
        } else {
            format!("https://{}", raw)
        };

        let url = Url::parse(&with_scheme)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", with_scheme, e)))?;
        if url.host_str().is_none() {
            return Err(ApiError::InvalidEndpoint(format!(
                "{}: missing host",
                with_scheme
            )));
        }

        Ok(with_scheme.trim_end_matches('/').to_string())
    }
}
