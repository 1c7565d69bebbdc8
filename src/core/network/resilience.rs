//! Retry and bounded-request helpers
//!
//! `with_retry` propagates the last error once attempts run out, so callers
//! can tell "temporarily degraded" from "permanently failed".
//! `safe_server_request` never fails: a timeout or error yields the
//! caller's fallback value.

use crate::core::network::debug_logger::get_debug_logger;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first; 0 behaves like 1
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 5000,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay after failed attempt `attempt` (1-based):
    /// `min(base * 2^(attempt-1), max)`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63);
        let delay = self
            .base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// Retry `operation` up to `max_retries` attempts with the default backoff
pub async fn with_retry<T, E, F, Fut>(operation: F, max_retries: u32) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    with_retry_policy(operation, &RetryPolicy::with_max_attempts(max_retries)).await
}

/// Retry `operation` according to `policy`, returning the last error on exhaustion
pub async fn with_retry_policy<T, E, F, Fut>(mut operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => return Err(err),
            Err(err) => {
                let delay = policy.delay_for_attempt(attempt);
                get_debug_logger().retry_attempt(
                    attempt,
                    max_attempts,
                    delay.as_millis() as u64,
                    &err.to_string(),
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Run `request_fn` bounded by `timeout_ms`, substituting `fallback_value`
/// on error or timeout
pub async fn safe_server_request<T, E, F, Fut>(request_fn: F, fallback_value: T, timeout_ms: u64) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), request_fn()).await {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            get_debug_logger().debug_sync("SafeRequest", "request_failed", &err.to_string());
            fallback_value
        }
        Err(_) => {
            get_debug_logger().debug_sync(
                "SafeRequest",
                "request_timeout",
                &format!("Request timed out after {}ms", timeout_ms),
            );
            fallback_value
        }
    }
}
