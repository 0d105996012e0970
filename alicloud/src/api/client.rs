use reqwest::header::ACCEPT;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::common::{ErrorResponse, RpcParams};
use super::endpoint::{Endpoints, Product};
use super::error::ApiError;
use super::pool::{ConnectionPoolConfig, ConnectionPoolManager, RequestOutcome};

/// Alibaba Cloud RPC API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    credentials: Credentials,
    region: String,
    endpoints: Endpoints,
    retry_config: RetryConfig,
    pool_manager: ConnectionPoolManager,
}

/// Access key pair with an optional STS token
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub security_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            security_token: None,
        }
    }

    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        std::cmp::min(
            self.initial_backoff_ms.saturating_mul(factor),
            self.max_backoff_ms,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub region: String,
    pub endpoints: Endpoints,
    pub insecure: bool,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
            endpoints: Endpoints::new(),
            insecure: false,
            retry: RetryConfig::default(),
        }
    }
}

impl Client {
    /// Create a new API client
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let pool_config = ConnectionPoolConfig::with_request_timeout(config.retry.timeout_seconds);

        let pool_manager = ConnectionPoolManager::new(pool_config);
        let http_client = pool_manager.build_client(config.insecure)?;

        for product in Product::ALL {
            config.endpoints.resolve(product, &config.region)?;
        }

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                credentials: config.credentials,
                region: config.region,
                endpoints: config.endpoints,
                retry_config: config.retry,
                pool_manager,
            }),
        })
    }

    pub fn region(&self) -> &str {
        &self.inner.region
    }

    pub fn endpoint(&self, product: Product) -> Result<String, ApiError> {
        self.inner.endpoints.resolve(product, &self.inner.region)
    }

    /// Call an RPC action and return the decoded JSON body
    pub async fn do_request(
        &self,
        product: Product,
        action: &str,
        params: &RpcParams,
    ) -> Result<Value, ApiError> {
        let endpoint = self.endpoint(product)?;
        let query = self
            .common_params(product, action)
            .extend(params)
            .to_query_string();
        let url = format!("{}/{}", endpoint, query);

        tracing::debug!(
            "POST {} {} {}",
            endpoint,
            action,
            params.to_query_string()
        );

        self.execute_with_retry(
            || async {
                self.inner
                    .http_client
                    .post(&url)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
            },
            action,
        )
        .await
    }

    /// Get connection pool statistics
    pub async fn get_connection_stats(&self) -> super::pool::ConnectionStats {
        self.inner.pool_manager.get_stats().await
    }

    /// VPC API operations
    pub fn vpc(&self) -> crate::api::vpc::VpcApi<'_> {
        crate::api::vpc::VpcApi::new(self)
    }

    /// ECS API operations
    pub fn ecs(&self) -> crate::api::ecs::EcsApi<'_> {
        crate::api::ecs::EcsApi::new(self)
    }

    fn common_params(&self, product: Product, action: &str) -> RpcParams {
        let credentials = &self.inner.credentials;
        RpcParams::new()
            .add("Action", action)
            .add("Version", product.api_version())
            .add("Format", "JSON")
            .add("RegionId", &self.inner.region)
            .add("AccessKeyId", &credentials.access_key)
            .add_optional("SecurityToken", credentials.security_token.as_deref())
    }

    /// Execute request with retry logic
    async fn execute_with_retry<F, Fut>(&self, request_fn: F, action: &str) -> Result<Value, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let retry = &self.inner.retry_config;
        let pool = &self.inner.pool_manager;
        let mut attempt = 0;
        let mut last_error: Option<ApiError> = None;

        while attempt <= retry.max_retries {
            if attempt > 0 {
                let backoff = retry.backoff_ms(attempt);
                tracing::warn!(
                    "Retrying {} after {}ms (attempt {}): {}",
                    action,
                    backoff,
                    attempt,
                    last_error
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default()
                );
                pool.record_retry().await;
                tokio::time::sleep(tokio::time::Duration::from_millis(backoff)).await;
            }

            match request_fn().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let text = response.text().await?;

                    match parse_response(status, &text) {
                        Ok(body) => {
                            pool.record_request(action, RequestOutcome::Success).await;
                            return Ok(body);
                        }
                        Err(e) if e.is_retryable() => {
                            pool.record_request(action, outcome_of(&e)).await;
                            last_error = Some(e);
                        }
                        Err(e) => {
                            pool.record_request(action, RequestOutcome::Failed).await;
                            return Err(e);
                        }
                    }
                }
                Err(e) => {
                    pool.record_request(action, RequestOutcome::Failed).await;

                    if e.is_timeout() {
                        last_error = Some(ApiError::Timeout(retry.timeout_seconds));
                    } else if e.is_connect() || e.is_request() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::RequestError(e));
                    }
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }
}

fn outcome_of(error: &ApiError) -> RequestOutcome {
    match error {
        ApiError::RateLimited => RequestOutcome::Throttled,
        ApiError::Service { status: 429, .. } => RequestOutcome::Throttled,
        ApiError::Service { code, .. } if code.starts_with("Throttling") => {
            RequestOutcome::Throttled
        }
        _ => RequestOutcome::Failed,
    }
}

/// Turn a raw HTTP status and body into the JSON document or a typed error
pub(crate) fn parse_response(status: u16, text: &str) -> Result<Value, ApiError> {
    if (200..300).contains(&status) {
        let body: Value = serde_json::from_str(text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })?;

        if let Some(err) = ErrorResponse::from_success_false(&body) {
            return Err(ApiError::from_service(
                status,
                err.code,
                err.message,
                err.request_id,
            ));
        }
        return Ok(body);
    }

    match serde_json::from_str::<ErrorResponse>(text) {
        Ok(err) => Err(ApiError::from_service(
            status,
            err.code,
            err.message,
            err.request_id,
        )),
        Err(_) => match status {
            429 => Err(ApiError::RateLimited),
            500..=599 => Err(ApiError::ServiceUnavailable),
            401 | 403 => Err(ApiError::AuthError {
                code: format!("HTTP{}", status),
                message: text.to_string(),
            }),
            _ => Err(ApiError::Service {
                status,
                code: format!("HTTP{}", status),
                message: text.to_string(),
                request_id: None,
            }),
        },
    }
}
