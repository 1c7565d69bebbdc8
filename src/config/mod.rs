pub mod defaults;
pub mod types;

pub use defaults::DEFAULT_BASE_URL;
pub use types::{
    ApiConfig, CacheConfig, Config, ConfigError, EndpointConfig, RetryConfig, TimeoutConfig,
    MAX_TIMEOUT_MS,
};
