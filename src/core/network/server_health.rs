//! Server health service
//!
//! Wires one HTTP transport, one cache and the endpoint set from [`Config`]
//! into the checker, stats fetcher and diagnostic suite. Each service owns
//! its own cache; nothing is process-global except the debug logger.

use crate::config::{Config, ConfigError};
use crate::core::network::diagnostics::{DiagnosticReport, ServerDiagnostic};
use crate::core::network::edge_client::EdgeFunctionClient;
use crate::core::network::endpoints::Endpoints;
use crate::core::network::health_cache::HealthCache;
use crate::core::network::health_checker::HealthChecker;
use crate::core::network::http_client::{ClockTrait, HttpClientTrait, SystemClock};
use crate::core::network::stats_fetcher::StatsFetcher;
use crate::core::network::types::{DatabaseStats, HealthStatus, NetworkError, StatusSummary};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub struct ServerHealthService {
    checker: HealthChecker,
    stats: StatsFetcher,
    diagnostic: ServerDiagnostic,
    health_timeout_ms: u32,
    stats_timeout_ms: u32,
}

impl ServerHealthService {
    /// Build with the production transport and system clock
    #[cfg(feature = "http-client")]
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let http_client = crate::core::network::http_client::IsahcHttpClient::new()?;
        Self::with_parts(config, Arc::new(http_client), Arc::new(SystemClock))
    }

    #[cfg(not(feature = "http-client"))]
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let http_client = crate::core::network::http_client::OfflineHttpClient;
        Self::with_parts(config, Arc::new(http_client), Arc::new(SystemClock))
    }

    /// Build with an injected transport and clock (for testing)
    pub fn with_parts(
        config: &Config,
        http_client: Arc<dyn HttpClientTrait>,
        clock: Arc<dyn ClockTrait>,
    ) -> Result<Self, ServiceError> {
        config.check()?;
        let endpoints: Endpoints = config.endpoints()?;

        let client = Arc::new(EdgeFunctionClient::new(
            http_client,
            config.api.anon_key.clone(),
        ));
        let cache = Arc::new(HealthCache::with_ttl(clock.clone(), config.cache.ttl_ms));

        let checker = HealthChecker::new(
            client.clone(),
            cache,
            clock.clone(),
            endpoints.ping_url.clone(),
            endpoints.health_url.clone(),
        );
        let stats = StatsFetcher::new(
            client.clone(),
            endpoints.stats_url.clone(),
            endpoints.fallback_stats_url.clone(),
        );
        let diagnostic = ServerDiagnostic::new(
            client,
            endpoints,
            config.retry_policy(),
            config.timeouts.health_ms,
            clock,
        );

        Ok(Self {
            checker,
            stats,
            diagnostic,
            health_timeout_ms: config.timeouts.health_ms,
            stats_timeout_ms: config.timeouts.stats_ms,
        })
    }

    pub fn checker(&self) -> &HealthChecker {
        &self.checker
    }

    pub fn stats_fetcher(&self) -> &StatsFetcher {
        &self.stats
    }

    pub async fn check_health(&self) -> HealthStatus {
        self.checker.check_health(self.health_timeout_ms).await
    }

    /// Connection fixer "retry now": bypass the cache
    pub async fn retry_now(&self) -> HealthStatus {
        self.checker.refresh(self.health_timeout_ms).await
    }

    pub fn status_summary(&self) -> StatusSummary {
        self.checker.cached_summary()
    }

    pub async fn fetch_stats(&self) -> DatabaseStats {
        self.stats.fetch_stats(self.stats_timeout_ms).await
    }

    pub async fn fetch_category_breakdown(&self) -> BTreeMap<String, u64> {
        self.stats.fetch_category_breakdown(self.stats_timeout_ms).await
    }

    pub async fn run_diagnostics(&self) -> DiagnosticReport {
        self.diagnostic.run().await
    }
}
