// Terminal rendering for server health, connection banners and stats
use crate::core::network::types::{DatabaseStats, ErrorKind, HealthStatus};
use serde::Serialize;

/// Dashboard badge for the current health state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    Healthy,
    Unhealthy,
    FallbackMode,
    Unknown,
}

impl StatusBadge {
    /// Badge for an optional status
    ///
    /// Connection-level failures (network, timeout) show as Fallback Mode:
    /// the backend may be fine and cached/default data is being served.
    /// Any other failure is Unhealthy.
    pub fn from_status(status: Option<&HealthStatus>) -> Self {
        match status {
            None => StatusBadge::Unknown,
            Some(s) if s.is_healthy() => StatusBadge::Healthy,
            Some(s) => match s.error_kind() {
                Some(kind) if kind.is_quiet() => StatusBadge::FallbackMode,
                _ => StatusBadge::Unhealthy,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusBadge::Healthy => "Healthy",
            StatusBadge::Unhealthy => "Unhealthy",
            StatusBadge::FallbackMode => "Fallback Mode",
            StatusBadge::Unknown => "Unknown",
        }
    }
}

/// Failure category shown in the connection error banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionIssue {
    Auth,
    Permission,
    Timeout,
    Server,
    Network,
    Unknown,
}

impl ConnectionIssue {
    pub fn classify(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Http { status: 401 } => ConnectionIssue::Auth,
            ErrorKind::Http { status: 403 } => ConnectionIssue::Permission,
            ErrorKind::Http { status } if (500..600).contains(&status) => ConnectionIssue::Server,
            ErrorKind::Timeout => ConnectionIssue::Timeout,
            ErrorKind::Network => ConnectionIssue::Network,
            ErrorKind::Http { .. } | ErrorKind::Decode => ConnectionIssue::Unknown,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ConnectionIssue::Auth => "Authentication failed",
            ConnectionIssue::Permission => "Permission denied",
            ConnectionIssue::Timeout => "Server timed out",
            ConnectionIssue::Server => "Server error",
            ConnectionIssue::Network => "Network unreachable",
            ConnectionIssue::Unknown => "Connection problem",
        }
    }

    pub fn suggested_action(&self) -> &'static str {
        match self {
            ConnectionIssue::Auth => "Refresh to renew your session credentials.",
            ConnectionIssue::Permission => "Contact support to request access.",
            ConnectionIssue::Timeout => "Retry in a few moments.",
            ConnectionIssue::Server => "Retry later; contact support if it persists.",
            ConnectionIssue::Network => "Check your connection, then retry.",
            ConnectionIssue::Unknown => "Retry; contact support if it persists.",
        }
    }
}

/// Renders health status and stats for terminal display
pub struct StatusRenderer;

impl StatusRenderer {
    pub fn new() -> Self {
        Self
    }

    /// One-line status: "Healthy (42ms)", "Fallback Mode: <error>", "Unknown"
    pub fn render(&self, status: Option<&HealthStatus>) -> String {
        let badge = StatusBadge::from_status(status);
        match status {
            None => badge.label().to_string(),
            Some(s) if s.is_healthy() => match s.response_time_ms() {
                Some(ms) => format!("{} ({}ms)", badge.label(), ms),
                None => badge.label().to_string(),
            },
            Some(s) => match s.error() {
                Some(error) => format!("{}: {}", badge.label(), error),
                None => badge.label().to_string(),
            },
        }
    }

    /// Banner explaining a failure, `None` when healthy
    pub fn render_banner(&self, status: &HealthStatus) -> Option<String> {
        if status.is_healthy() {
            return None;
        }
        let issue = status
            .error_kind()
            .map(ConnectionIssue::classify)
            .unwrap_or(ConnectionIssue::Unknown);
        let error = status.error().unwrap_or("unknown error");
        Some(format!(
            "{}: {}\n{}",
            issue.title(),
            error,
            issue.suggested_action()
        ))
    }

    pub fn render_stats(&self, stats: &DatabaseStats) -> String {
        let mut lines = vec![
            format!("Total records:   {}", stats.total_records),
            format!("Recent activity: {}", stats.recent_activity),
            format!("Data quality:    {}%", stats.data_quality),
        ];
        if !stats.category_breakdown.is_empty() {
            lines.push("Categories:".to_string());
            let width = stats
                .category_breakdown
                .keys()
                .map(|name| name.len())
                .max()
                .unwrap_or(0);
            for (name, count) in &stats.category_breakdown {
                lines.push(format!("  {:<width$}  {}", name, count, width = width));
            }
        }
        lines.join("\n")
    }
}

impl Default for StatusRenderer {
    fn default() -> Self {
        Self::new()
    }
}
