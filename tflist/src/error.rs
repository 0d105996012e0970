//! Error types for tflist

/// Error type for listing operations
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Invalid name_regex {pattern:?}: {source}")]
    InvalidNameRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("{action} failed: {source}")]
    Backend {
        action: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Getting attribute by path {path} failed, body: {body}")]
    Extraction { path: String, body: String },

    #[error("Decoding item at {path} failed: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for listing operations
pub type Result<T> = std::result::Result<T, ListError>;

impl ListError {
    pub fn backend<E>(action: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ListError::Backend {
            action: action.into(),
            source: Box::new(err),
        }
    }

    pub fn extraction(path: impl Into<String>, response: &serde_json::Value) -> Self {
        ListError::Extraction {
            path: path.into(),
            body: response.to_string(),
        }
    }

    /// True for errors raised from caller input before any fetch
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ListError::InvalidNameRegex { .. } | ListError::InvalidPageSize
        )
    }
}
