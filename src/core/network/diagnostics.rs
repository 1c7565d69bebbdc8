//! Server Diagnostic Suite
//!
//! Runs one retried probe per backend endpoint and summarizes the results:
//! - `ping` / `health`: liveness endpoints used by the health checker
//! - `stats` / `stats_fallback`: statistics endpoints used by the stats fetcher
//!
//! Unlike the checker and fetcher, each probe here fails loudly: retries are
//! exhausted through [`with_retry_policy`] and the final error is recorded.

use crate::core::network::edge_client::EdgeFunctionClient;
use crate::core::network::endpoints::Endpoints;
use crate::core::network::http_client::ClockTrait;
use crate::core::network::resilience::{with_retry_policy, RetryPolicy};
use crate::core::network::status_renderer::StatusBadge;
use crate::core::network::types::FetchError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticResult {
    pub name: String,
    pub url: String,
    pub passed: bool,
    pub attempts: u32,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub generated_at: String,
    pub overall: StatusBadge,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<DiagnosticResult>,
}

impl DiagnosticReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn result(&self, name: &str) -> Option<&DiagnosticResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

pub struct ServerDiagnostic {
    client: Arc<EdgeFunctionClient>,
    endpoints: Endpoints,
    policy: RetryPolicy,
    timeout_ms: u32,
    clock: Arc<dyn ClockTrait>,
}

impl ServerDiagnostic {
    pub fn new(
        client: Arc<EdgeFunctionClient>,
        endpoints: Endpoints,
        policy: RetryPolicy,
        timeout_ms: u32,
        clock: Arc<dyn ClockTrait>,
    ) -> Self {
        Self {
            client,
            endpoints,
            policy,
            timeout_ms,
            clock,
        }
    }

    /// Run every check concurrently and build the report
    pub async fn run(&self) -> DiagnosticReport {
        let checks = [
            ("ping", self.endpoints.ping_url.as_str()),
            ("health", self.endpoints.health_url.as_str()),
            ("stats", self.endpoints.stats_url.as_str()),
            ("stats_fallback", self.endpoints.fallback_stats_url.as_str()),
        ];

        let results = futures::future::join_all(
            checks.iter().map(|(name, url)| self.run_check(name, url)),
        )
        .await;

        let passed = results.iter().filter(|r| r.passed).count();
        let failed = results.len() - passed;
        let liveness_ok = results
            .iter()
            .any(|r| r.passed && (r.name == "ping" || r.name == "health"));

        let overall = if failed == 0 {
            StatusBadge::Healthy
        } else if liveness_ok {
            StatusBadge::FallbackMode
        } else {
            StatusBadge::Unhealthy
        };

        DiagnosticReport {
            generated_at: self.clock.local_timestamp(),
            overall,
            passed,
            failed,
            results,
        }
    }

    async fn run_check(&self, name: &str, url: &str) -> DiagnosticResult {
        let mut attempts = 0u32;
        let start = tokio::time::Instant::now();

        let outcome = with_retry_policy(
            || {
                attempts += 1;
                self.probe_endpoint(url)
            },
            &self.policy,
        )
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(status) => DiagnosticResult {
                name: name.to_string(),
                url: url.to_string(),
                passed: true,
                attempts,
                duration_ms,
                status_code: Some(status),
                error: None,
            },
            Err(err) => DiagnosticResult {
                name: name.to_string(),
                url: url.to_string(),
                passed: false,
                attempts,
                duration_ms,
                status_code: match &err {
                    FetchError::Http { status, .. } => Some(*status),
                    _ => None,
                },
                error: Some(err.to_string()),
            },
        }
    }

    async fn probe_endpoint(&self, url: &str) -> Result<u16, FetchError> {
        let response = self.client.get(url, self.timeout_ms).await?;
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }
        Ok(response.status)
    }
}
