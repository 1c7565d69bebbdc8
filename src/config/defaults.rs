// Built-in defaults, used for missing files and missing keys

use super::types::{ApiConfig, CacheConfig, Config, EndpointConfig, RetryConfig, TimeoutConfig};
use crate::core::network::health_cache::DEFAULT_HEALTH_TTL_MS;

pub const DEFAULT_BASE_URL: &str = "http://localhost:54321/functions/v1/make-server";

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            api: ApiConfig::default(),
            endpoints: EndpointConfig::default(),
            timeouts: TimeoutConfig::default(),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            anon_key: String::new(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            ping_path: "/ping".to_string(),
            health_path: "/health".to_string(),
            stats_path: "/admin/stats".to_string(),
            fallback_stats_path: "/stats".to_string(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        TimeoutConfig {
            health_ms: 5000,
            stats_ms: 10_000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_ms: DEFAULT_HEALTH_TTL_MS,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 5000,
        }
    }
}
