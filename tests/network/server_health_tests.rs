use crate::common::{
    ManualClock, Scripted, ScriptedHttpClient, ANON_KEY, BASE_URL, HEALTH_URL, PING_URL,
    STATS_URL,
};
use scanhealth::config::{Config, ConfigError};
use scanhealth::core::network::{
    ServerHealthService, ServiceError, StatusBadge, StatusSummary,
};
use std::sync::Arc;

fn test_config() -> Config {
    let mut config = Config::default();
    config.api.base_url = BASE_URL.to_string();
    config.api.anon_key = ANON_KEY.to_string();
    config
}

fn build_service(client: &Arc<ScriptedHttpClient>, clock: &Arc<ManualClock>) -> ServerHealthService {
    match ServerHealthService::with_parts(&test_config(), client.clone(), clock.clone()) {
        Ok(service) => service,
        Err(err) => panic!("service should build: {}", err),
    }
}

#[tokio::test]
async fn test_service_checks_configured_endpoints() {
    let client = Arc::new(ScriptedHttpClient::new());
    client.script(PING_URL, vec![Scripted::ok("pong")]);
    let clock = Arc::new(ManualClock::new(1_000));
    let service = build_service(&client, &clock);

    assert_eq!(service.status_summary(), StatusSummary::Unknown);

    let status = service.check_health().await;

    assert!(status.is_healthy());
    assert_eq!(status.timestamp(), 1_000);
    assert_eq!(service.status_summary(), StatusSummary::Healthy);
    assert_eq!(client.call_count(PING_URL), 1);
    assert_eq!(client.call_count(HEALTH_URL), 0);
}

#[tokio::test]
async fn test_retry_now_bypasses_cache() {
    let client = Arc::new(ScriptedHttpClient::new());
    client.script(
        PING_URL,
        vec![Scripted::status(503, "Service Unavailable"), Scripted::ok("pong")],
    );
    let clock = Arc::new(ManualClock::new(0));
    let service = build_service(&client, &clock);

    let first = service.check_health().await;
    assert!(!first.is_healthy());

    // Cached failure is served until the TTL expires
    let cached = service.check_health().await;
    assert_eq!(cached, first);
    assert_eq!(client.call_count(PING_URL), 1);

    let retried = service.retry_now().await;
    assert!(retried.is_healthy());
    assert_eq!(client.call_count(PING_URL), 2);
}

#[tokio::test]
async fn test_service_fetches_stats() {
    let client = Arc::new(ScriptedHttpClient::new());
    client.script(
        STATS_URL,
        vec![Scripted::ok(r#"{"stats":{"totalRecords":12,"dataQuality":80}}"#)],
    );
    let clock = Arc::new(ManualClock::new(0));
    let service = build_service(&client, &clock);

    let stats = service.fetch_stats().await;

    assert_eq!(stats.total_records, 12);
    assert_eq!(stats.data_quality, 80);
    assert!(service.fetch_category_breakdown().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_service_diagnostics_use_configured_policy() {
    let client = Arc::new(ScriptedHttpClient::new());
    client.script(PING_URL, vec![Scripted::ok("pong")]);
    let clock = Arc::new(ManualClock::new(0));
    let service = build_service(&client, &clock);

    let report = service.run_diagnostics().await;

    assert_eq!(report.overall, StatusBadge::FallbackMode);
    assert_eq!(report.result("ping").map(|r| r.attempts), Some(1));
    assert_eq!(report.result("health").map(|r| r.attempts), Some(3));
}

#[test]
fn test_invalid_config_is_rejected() {
    let client = Arc::new(ScriptedHttpClient::new());
    let clock = Arc::new(ManualClock::new(0));

    let mut config = test_config();
    config.api.base_url = "ftp://files.example.com".to_string();
    let result = ServerHealthService::with_parts(&config, client.clone(), clock.clone());
    assert!(matches!(
        result,
        Err(ServiceError::Config(ConfigError::InvalidBaseUrl(_)))
    ));

    let mut config = test_config();
    config.timeouts.health_ms = 0;
    let result = ServerHealthService::with_parts(&config, client, clock);
    assert!(matches!(
        result,
        Err(ServiceError::Config(ConfigError::Invalid(_)))
    ));
}
