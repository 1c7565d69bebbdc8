//! Single-slot health status cache with a TTL window

use crate::core::network::http_client::ClockTrait;
use crate::core::network::types::{HealthStatus, StatusSummary};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default time-to-live for a cached health status (5 minutes)
pub const DEFAULT_HEALTH_TTL_MS: i64 = 300_000;

/// Holds the most recent health status so repeated checks inside the TTL
/// window do not hit the network.
///
/// One slot, last write wins. Shared between the checker and its callers
/// through `Arc`; every instance is independent.
pub struct HealthCache {
    slot: Mutex<Option<HealthStatus>>,
    ttl_ms: i64,
    clock: Arc<dyn ClockTrait>,
}

impl HealthCache {
    pub fn new(clock: Arc<dyn ClockTrait>) -> Self {
        Self::with_ttl(clock, DEFAULT_HEALTH_TTL_MS)
    }

    pub fn with_ttl(clock: Arc<dyn ClockTrait>, ttl_ms: i64) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl_ms,
            clock,
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Cached status if it was recorded less than `ttl_ms` ago
    pub fn get(&self) -> Option<HealthStatus> {
        let now = self.clock.epoch_ms();
        self.lock()
            .as_ref()
            .filter(|status| now - status.timestamp() < self.ttl_ms)
            .cloned()
    }

    pub fn set(&self, status: HealthStatus) {
        *self.lock() = Some(status);
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn status_summary(&self) -> StatusSummary {
        match self.get() {
            Some(status) if status.is_healthy() => StatusSummary::Healthy,
            Some(_) => StatusSummary::Unhealthy,
            None => StatusSummary::Unknown,
        }
    }

    // A panic while holding the lock cannot leave a half-written status
    fn lock(&self) -> MutexGuard<'_, Option<HealthStatus>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
