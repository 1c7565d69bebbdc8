//! Server Health Checking
//!
//! Determines connectivity to the backend with:
//! - TTL-cached results to avoid redundant probes
//! - Primary ping endpoint with fallback health endpoint on connection failure
//! - Per-attempt timeout budgets
//! - Failures converted to a fallback-active status, never returned as errors

use crate::core::network::debug_logger::get_debug_logger;
use crate::core::network::edge_client::{AttemptSource, EdgeFunctionClient};
use crate::core::network::health_cache::HealthCache;
use crate::core::network::http_client::ClockTrait;
use crate::core::network::types::{FetchError, HealthStatus, StatusSummary};
use std::sync::Arc;

pub struct HealthChecker {
    client: Arc<EdgeFunctionClient>,
    cache: Arc<HealthCache>,
    clock: Arc<dyn ClockTrait>,
    ping_url: String,
    health_url: String,
}

impl HealthChecker {
    pub fn new(
        client: Arc<EdgeFunctionClient>,
        cache: Arc<HealthCache>,
        clock: Arc<dyn ClockTrait>,
        ping_url: impl Into<String>,
        health_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            cache,
            clock,
            ping_url: ping_url.into(),
            health_url: health_url.into(),
        }
    }

    pub fn cache(&self) -> &Arc<HealthCache> {
        &self.cache
    }

    /// Current health status, from cache when fresh
    ///
    /// # Behavior
    /// 1. Return the cached status on a TTL hit
    /// 2. GET the ping endpoint with `timeout_ms`
    /// 3. On network error or timeout, GET the health endpoint with a fresh `timeout_ms`
    /// 4. Non-2xx final response is a failure: "Server returned {status}: {status_text}"
    /// 5. Success or failure is cached and returned; this call never fails
    pub async fn check_health(&self, timeout_ms: u32) -> HealthStatus {
        if let Some(cached) = self.cache.get() {
            return cached;
        }

        let logger = get_debug_logger();
        let probe_id = format!("probe_{}", uuid::Uuid::new_v4());
        logger.health_probe_start(&self.ping_url, timeout_ms as u64, probe_id.clone());

        let start = tokio::time::Instant::now();
        let result = self.probe(timeout_ms).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        let now = self.clock.epoch_ms();

        let status = match result {
            Ok(http_status) => {
                logger.health_probe_end(true, Some(http_status), elapsed_ms, probe_id);
                HealthStatus::healthy(now, elapsed_ms)
            }
            Err(err) => {
                let http_status = match &err {
                    FetchError::Http { status, .. } => Some(*status),
                    _ => None,
                };
                logger.health_probe_end(false, http_status, elapsed_ms, probe_id);
                if err.is_quiet() {
                    logger.debug_sync("HealthChecker", "health_check_failed", &err.to_string());
                } else {
                    logger.warn_sync("HealthChecker", "health_check_failed", &err.to_string());
                }
                HealthStatus::unhealthy(now, &err)
            }
        };

        self.cache.set(status.clone());
        status
    }

    /// Drop the cached status and probe again ("retry now")
    pub async fn refresh(&self, timeout_ms: u32) -> HealthStatus {
        self.cache.clear();
        self.check_health(timeout_ms).await
    }

    pub fn cached_summary(&self) -> StatusSummary {
        self.cache.status_summary()
    }

    /// Returns the successful HTTP status code
    async fn probe(&self, timeout_ms: u32) -> Result<u16, FetchError> {
        let (response, source) = self
            .client
            .get_with_fallback(&self.ping_url, &self.health_url, timeout_ms)
            .await?;
        if source == AttemptSource::Fallback {
            get_debug_logger().debug_sync(
                "HealthChecker",
                "served_by",
                &format!("Health answered by {} endpoint", source.as_str()),
            );
        }

        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }

        Ok(response.status)
    }
}
