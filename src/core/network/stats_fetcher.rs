//! Aggregate statistics retrieval with fallback data

use crate::core::network::debug_logger::get_debug_logger;
use crate::core::network::edge_client::{AttemptSource, EdgeFunctionClient};
use crate::core::network::stats_parsing::{fallback_stats, normalize_stats, StatsShape};
use crate::core::network::types::{DatabaseStats, FetchError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of one pass through the stats pipeline
#[derive(Debug)]
enum StatsOutcome {
    Parsed(StatsShape, DatabaseStats),
    NotFound,
    Unrecognized,
}

pub struct StatsFetcher {
    client: Arc<EdgeFunctionClient>,
    stats_url: String,
    fallback_stats_url: String,
}

impl StatsFetcher {
    pub fn new(
        client: Arc<EdgeFunctionClient>,
        stats_url: impl Into<String>,
        fallback_stats_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            stats_url: stats_url.into(),
            fallback_stats_url: fallback_stats_url.into(),
        }
    }

    /// Fetch and normalize stats; never fails
    ///
    /// A 404, an unrecognized body or any error yields [`fallback_stats`].
    pub async fn fetch_stats(&self, timeout_ms: u32) -> DatabaseStats {
        let logger = get_debug_logger();
        let start = tokio::time::Instant::now();

        match self.try_fetch(timeout_ms).await {
            Ok(StatsOutcome::Parsed(shape, stats)) => {
                logger.stats_fetch_summary(
                    shape.as_str(),
                    stats.total_records,
                    start.elapsed().as_millis() as u64,
                );
                stats
            }
            Ok(StatsOutcome::NotFound) => {
                logger.fallback_engaged("StatsFetcher", "stats endpoint returned 404");
                fallback_stats()
            }
            Ok(StatsOutcome::Unrecognized) => {
                logger.warn_sync(
                    "StatsFetcher",
                    "unrecognized_shape",
                    "Stats response has no expected fields, using fallback stats",
                );
                fallback_stats()
            }
            Err(err) => {
                if err.is_quiet() {
                    logger.debug_sync("StatsFetcher", "stats_fetch_failed", &err.to_string());
                } else {
                    logger.warn_sync("StatsFetcher", "stats_fetch_failed", &err.to_string());
                }
                logger.fallback_engaged("StatsFetcher", &err.to_string());
                fallback_stats()
            }
        }
    }

    /// Category counts only, with the same fallback contract
    pub async fn fetch_category_breakdown(&self, timeout_ms: u32) -> BTreeMap<String, u64> {
        self.fetch_stats(timeout_ms).await.category_breakdown
    }

    async fn try_fetch(&self, timeout_ms: u32) -> Result<StatsOutcome, FetchError> {
        let (response, source) = self
            .client
            .get_with_fallback(&self.stats_url, &self.fallback_stats_url, timeout_ms)
            .await?;
        if source == AttemptSource::Fallback {
            get_debug_logger().debug_sync(
                "StatsFetcher",
                "served_by",
                &format!("Stats answered by {} endpoint ({})", source.as_str(), response.status),
            );
        }

        if response.status == 404 {
            return Ok(StatsOutcome::NotFound);
        }
        if !response.is_success() {
            return Err(FetchError::StatsStatus(response.status));
        }

        let data: serde_json::Value = serde_json::from_slice(&response.body)
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(match normalize_stats(&data) {
            Some((shape, stats)) => StatsOutcome::Parsed(shape, stats),
            None => StatsOutcome::Unrecognized,
        })
    }
}
