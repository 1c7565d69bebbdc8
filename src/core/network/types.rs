// Core types for server health monitoring
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Legacy per-category counters reported by older stats endpoints
pub const LEGACY_CATEGORIES: [&str; 8] = [
    "nutrients",
    "products",
    "ingredients",
    "pollutants",
    "parasites",
    "meals",
    "scans",
    "waitlist",
];

/// Typed failure kind produced by the HTTP layer
///
/// Consumers switch on the kind instead of matching error message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection-level failure (DNS, refused, reset, TLS)
    Network,
    /// The attempt exceeded its timeout budget
    Timeout,
    /// The server answered with a non-2xx status
    Http { status: u16 },
    /// The response body could not be decoded
    Decode,
}

impl ErrorKind {
    /// Quiet kinds are expected while offline and are kept out of warning logs
    pub fn is_quiet(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Timeout)
    }

    /// Connection-level kinds are the only ones that trigger a fallback endpoint
    pub fn is_connection_level(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Timeout)
    }
}

/// Request failures surfaced by the edge client and its callers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0}ms")]
    Timeout(u32),
    #[error("Server returned {status}: {status_text}")]
    Http { status: u16, status_text: String },
    #[error("Stats request failed: {0}")]
    StatsStatus(u16),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Timeout(_) => ErrorKind::Timeout,
            FetchError::Http { status, .. } => ErrorKind::Http { status: *status },
            FetchError::StatsStatus(status) => ErrorKind::Http { status: *status },
            FetchError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.kind().is_quiet()
    }
}

/// Raw HTTP response as returned by an [`HttpClientTrait`](super::HttpClientTrait)
///
/// Non-2xx statuses are ordinary responses; only connection-level failures
/// are reported as errors by the client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
    pub duration: Duration,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Result of a single health probe
///
/// A status is either healthy (live-verified, with a response time) or
/// unhealthy (fallback active, with an error). The constructors are the
/// only way to build one, so no other combination can exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    healthy: bool,
    /// Epoch milliseconds when the status was recorded
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    fallback_active: bool,
}

impl HealthStatus {
    pub fn healthy(timestamp: i64, response_time_ms: u64) -> Self {
        Self {
            healthy: true,
            timestamp,
            response_time_ms: Some(response_time_ms),
            error: None,
            error_kind: None,
            fallback_active: false,
        }
    }

    pub fn unhealthy(timestamp: i64, error: &FetchError) -> Self {
        Self {
            healthy: false,
            timestamp,
            response_time_ms: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            fallback_active: true,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn response_time_ms(&self) -> Option<u64> {
        self.response_time_ms
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn is_fallback_active(&self) -> bool {
        self.fallback_active
    }

    /// Check the healthy/fallback invariant
    pub fn is_consistent(&self) -> bool {
        if self.healthy {
            !self.fallback_active && self.response_time_ms.is_some() && self.error.is_none()
        } else {
            self.fallback_active && self.error.is_some()
        }
    }
}

/// Coarse cached health state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSummary {
    Healthy,
    Unhealthy,
    Unknown,
}

impl StatusSummary {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusSummary::Healthy => "healthy",
            StatusSummary::Unhealthy => "unhealthy",
            StatusSummary::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate database statistics in canonical shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseStats {
    pub total_records: u64,
    pub category_breakdown: BTreeMap<String, u64>,
    pub recent_activity: u64,
    /// Percentage in [0, 100]
    pub data_quality: u32,
}

/// Construction-time failures
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("HTTP error: {0}")]
    HttpError(String),
}

/// Generate standardized local timezone ISO-8601 timestamp
pub fn get_local_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Current wall-clock time in epoch milliseconds
pub fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
