use thiserror::Error;

/// Error codes that signal a transient condition on the service side
pub const RETRYABLE_CODES: &[&str] = &[
    "Throttling",
    "Throttling.User",
    "Throttling.Api",
    "ServiceUnavailable",
    "SystemBusy",
    "UnknownError",
    "OperationConflict",
    "LastTokenProcessing",
];

const AUTH_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "InvalidAccessKeyId.NotFound",
    "InvalidAccessKeyId.Inactive",
    "InvalidSecurityToken.Expired",
    "InvalidSecurityToken.MismatchWithAccessKey",
    "SignatureDoesNotMatch",
    "Forbidden.RAM",
];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{code}: {message} (HTTP {status}, RequestId: {})", .request_id.as_deref().unwrap_or("-"))]
    Service {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Authentication failed: {code}: {message}")]
    AuthError { code: String, message: String },

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Too many requests, rate limited")]
    RateLimited,

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Build the error for a service-reported failure, classifying auth codes
    pub fn from_service(
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    ) -> Self {
        if status == 401 || status == 403 || AUTH_CODES.contains(&code.as_str()) {
            return ApiError::AuthError { code, message };
        }
        ApiError::Service {
            status,
            code,
            message,
            request_id,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Service { status, code, .. } => {
                *status == 429 || *status >= 500 || RETRYABLE_CODES.contains(&code.as_str())
            }
            ApiError::Timeout(_) | ApiError::RateLimited | ApiError::ServiceUnavailable => true,
            _ => false,
        }
    }

    /// Service error code, when the service reported one
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Service { code, .. } | ApiError::AuthError { code, .. } => Some(code),
            _ => None,
        }
    }
}
