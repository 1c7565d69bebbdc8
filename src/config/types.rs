use crate::core::network::debug_logger::parse_flag;
use crate::core::network::endpoints::{validate_base_url, Endpoints, UrlError};
use crate::core::network::resilience::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_BASE_URL: &str = "SCANHEALTH_BASE_URL";
pub const ENV_ANON_KEY: &str = "SCANHEALTH_ANON_KEY";
pub const ENV_TIMEOUT_MS: &str = "SCANHEALTH_TIMEOUT_MS";
pub const ENV_DEBUG: &str = "SCANHEALTH_DEBUG";

/// Upper bound for timeout overrides from the environment
pub const MAX_TIMEOUT_MS: u32 = 60_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid base_url: {0}")]
    InvalidBaseUrl(#[from] UrlError),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debug: bool,
    pub api: ApiConfig,
    pub endpoints: EndpointConfig,
    pub timeouts: TimeoutConfig,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
}

/// Edge Function location and public (anon) credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub anon_key: String,
}

/// Endpoint paths relative to `api.base_url`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub ping_path: String,
    pub health_path: String,
    pub stats_path: String,
    pub fallback_stats_path: String,
}

/// Per-attempt budgets; a primary+fallback sequence may take twice as long
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub health_ms: u32,
    pub stats_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Config {
    /// `<config_dir>/scanhealth/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(dir.join("scanhealth").join("config.toml"))
    }

    /// Load from the default path, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path` (defaults when the file is missing), then apply
    /// environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Environment variables take precedence over the file
    ///
    /// Empty values are ignored; unparseable numbers are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(base_url) = non_empty_env(ENV_BASE_URL) {
            self.api.base_url = base_url;
        }
        if let Some(anon_key) = non_empty_env(ENV_ANON_KEY) {
            self.api.anon_key = anon_key;
        }
        if let Some(timeout) = non_empty_env(ENV_TIMEOUT_MS).and_then(|v| v.parse::<u32>().ok()) {
            let timeout = timeout.min(MAX_TIMEOUT_MS);
            self.timeouts.health_ms = timeout;
            self.timeouts.stats_ms = timeout;
        }
        if let Some(debug) = non_empty_env(ENV_DEBUG) {
            self.debug = parse_flag(&debug);
        }
    }

    /// Write the default config to the default path
    pub fn init() -> Result<PathBuf, ConfigError> {
        let path = Self::default_path()?;
        Self::default().save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn print(&self) -> Result<(), ConfigError> {
        print!("{}", self.to_toml_string()?);
        Ok(())
    }

    /// Validate everything the service needs before making requests
    pub fn check(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.api.base_url)?;
        if self.timeouts.health_ms == 0 || self.timeouts.stats_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be greater than 0".to_string()));
        }
        if self.cache.ttl_ms <= 0 {
            return Err(ConfigError::Invalid("cache.ttl_ms must be greater than 0".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".to_string()));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::Invalid(
                "retry.base_delay_ms must not exceed retry.max_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        Ok(Endpoints::resolve(
            &self.api.base_url,
            &self.endpoints.ping_path,
            &self.endpoints.health_path,
            &self.endpoints.stats_path,
            &self.endpoints.fallback_stats_path,
        )?)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base_delay_ms: self.retry.base_delay_ms,
            max_delay_ms: self.retry.max_delay_ms,
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
