pub mod debug_logger;
pub mod diagnostics;
pub mod edge_client;
pub mod endpoints;
pub mod health_cache;
pub mod health_checker;
pub mod http_client;
pub mod resilience;
pub mod server_health;
pub mod stats_fetcher;
pub mod stats_parsing;
pub mod status_renderer;
pub mod types;

// Re-export commonly used items
pub use debug_logger::{get_debug_logger, init_debug_logger, EnhancedDebugLogger};
pub use diagnostics::{DiagnosticReport, DiagnosticResult, ServerDiagnostic};
pub use edge_client::{AttemptSource, EdgeFunctionClient};
pub use endpoints::Endpoints;
pub use health_cache::{HealthCache, DEFAULT_HEALTH_TTL_MS};
pub use health_checker::HealthChecker;
pub use http_client::{ClockTrait, HttpClientTrait, SystemClock};
pub use resilience::{safe_server_request, with_retry, with_retry_policy, RetryPolicy};
pub use server_health::{ServerHealthService, ServiceError};
pub use stats_fetcher::StatsFetcher;
pub use stats_parsing::{fallback_stats, normalize_stats, StatsShape};
pub use status_renderer::{ConnectionIssue, StatusBadge, StatusRenderer};
pub use types::*;
