//! Endpoint URL Construction
//!
//! Builds the ping, health and stats URLs from the Edge Function base URL
//! and the configured relative paths.

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    ParseError(#[from] url::ParseError),
    #[error("Missing host in URL")]
    MissingHost,
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Fully resolved endpoint URLs used by the checker, fetcher and diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub ping_url: String,
    pub health_url: String,
    pub stats_url: String,
    pub fallback_stats_url: String,
}

impl Endpoints {
    /// Resolve all endpoints against a validated base URL
    ///
    /// # Examples
    /// - base `https://x.supabase.co/functions/v1/make-server/` + `/ping`
    ///   → `https://x.supabase.co/functions/v1/make-server/ping`
    pub fn resolve(
        base_url: &str,
        ping_path: &str,
        health_path: &str,
        stats_path: &str,
        fallback_stats_path: &str,
    ) -> Result<Self, UrlError> {
        validate_base_url(base_url)?;
        Ok(Self {
            ping_url: join_endpoint(base_url, ping_path),
            health_url: join_endpoint(base_url, health_path),
            stats_url: join_endpoint(base_url, stats_path),
            fallback_stats_url: join_endpoint(base_url, fallback_stats_path),
        })
    }
}

/// Check that a base URL is http(s) with a host
pub fn validate_base_url(base_url: &str) -> Result<(), UrlError> {
    let url = Url::parse(base_url)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    url.host_str().ok_or(UrlError::MissingHost)?;
    Ok(())
}

/// Append a relative path to a base URL without doubling or dropping slashes
///
/// Unlike `Url::join`, the base path is always preserved, so a base of
/// `https://host/functions/v1/server` keeps its last segment.
pub fn join_endpoint(base_url: &str, path: &str) -> String {
    let normalized = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        normalized
    } else {
        format!("{}/{}", normalized, path)
    }
}

/// Normalize base URL by trimming trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
