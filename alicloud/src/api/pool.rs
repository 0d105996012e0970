//! HTTP connection pool and request accounting for the RPC client

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const USER_AGENT: &str = concat!("alicloud-datasource/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const KEEPALIVE: Duration = Duration::from_secs(30);

/// Per-client HTTP settings. Only the request timeout follows the retry config.
pub struct ConnectionPoolConfig {
    pub request_timeout: Duration,
}

impl ConnectionPoolConfig {
    pub fn with_request_timeout(seconds: u64) -> Self {
        Self {
            request_timeout: Duration::from_secs(seconds),
        }
    }
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self::with_request_timeout(30)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStats {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub retried_requests: u64,
    pub throttled_requests: u64,
    pub last_action: Option<String>,
    pub last_request: Option<Instant>,
}

/// Outcome of a single HTTP attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failed,
    Throttled,
}

pub struct ConnectionPoolManager {
    stats: Arc<RwLock<ConnectionStats>>,
    config: ConnectionPoolConfig,
}

impl ConnectionPoolManager {
    pub fn new(config: ConnectionPoolConfig) -> Self {
        Self {
            stats: Arc::new(RwLock::new(ConnectionStats::default())),
            config,
        }
    }

    pub async fn record_request(&self, action: &str, outcome: RequestOutcome) {
        let mut stats = self.stats.write().await;
        stats.total_requests += 1;
        match outcome {
            RequestOutcome::Success => {}
            RequestOutcome::Failed => stats.failed_requests += 1,
            RequestOutcome::Throttled => {
                stats.failed_requests += 1;
                stats.throttled_requests += 1;
            }
        }
        stats.last_action = Some(action.to_string());
        stats.last_request = Some(Instant::now());
    }

    pub async fn record_retry(&self) {
        self.stats.write().await.retried_requests += 1;
    }

    pub async fn get_stats(&self) -> ConnectionStats {
        self.stats.read().await.clone()
    }

    pub fn build_client(&self, insecure: bool) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .user_agent(USER_AGENT)
            .timeout(self.config.request_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .tcp_keepalive(KEEPALIVE)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_is_configurable() {
        assert_eq!(ConnectionPoolConfig::default().request_timeout.as_secs(), 30);
        assert_eq!(
            ConnectionPoolConfig::with_request_timeout(5).request_timeout,
            Duration::from_secs(5)
        );
        assert!(USER_AGENT.starts_with("alicloud-datasource/"));
    }

    #[test]
    fn builds_http_client() {
        let manager = ConnectionPoolManager::new(ConnectionPoolConfig::default());
        assert!(manager.build_client(false).is_ok());
        assert!(manager.build_client(true).is_ok());
    }

    #[tokio::test]
    async fn stats_track_outcomes() {
        let manager = ConnectionPoolManager::new(ConnectionPoolConfig::default());

        let stats = manager.get_stats().await;
        assert_eq!(stats.total_requests, 0);
        assert!(stats.last_action.is_none());

        manager.record_request("DescribeVpcs", RequestOutcome::Success).await;
        manager.record_request("DescribeVpcs", RequestOutcome::Throttled).await;
        manager.record_retry().await;
        manager.record_request("DescribeVSwitches", RequestOutcome::Failed).await;

        let stats = manager.get_stats().await;
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.failed_requests, 2);
        assert_eq!(stats.throttled_requests, 1);
        assert_eq!(stats.retried_requests, 1);
        assert_eq!(stats.last_action.as_deref(), Some("DescribeVSwitches"));
        assert!(stats.last_request.is_some());
    }
}
