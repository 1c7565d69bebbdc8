use scanhealth::core::network::{safe_server_request, with_retry, with_retry_policy, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[test]
fn test_default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.base_delay_ms, 1000);
    assert_eq!(policy.max_delay_ms, 5000);
}

#[test]
fn test_backoff_delays_are_capped() {
    let policy = RetryPolicy::default();
    let delays: Vec<u64> = (1..=6)
        .map(|attempt| policy.delay_for_attempt(attempt).as_millis() as u64)
        .collect();

    assert_eq!(delays, vec![1000, 2000, 4000, 5000, 5000, 5000]);
}

#[test]
fn test_backoff_does_not_overflow() {
    let policy = RetryPolicy {
        max_attempts: 100,
        base_delay_ms: u64::MAX / 2,
        max_delay_ms: u64::MAX,
    };
    assert_eq!(policy.delay_for_attempt(90), Duration::from_millis(u64::MAX));
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_rethrows_last_error() {
    let calls = AtomicU32::new(0);
    let call_times = Mutex::new(Vec::new());
    let start = Instant::now();

    let result: Result<(), String> = with_retry(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            call_times.lock().unwrap().push(start.elapsed());
            async move { Err(format!("failure {}", n)) }
        },
        3,
    )
    .await;

    assert_eq!(result, Err("failure 3".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let times = call_times.lock().unwrap().clone();
    assert_eq!(times[0], Duration::ZERO);
    assert_eq!(times[1], Duration::from_millis(1000));
    assert_eq!(times[2], Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn test_retry_succeeds_after_transient_failures() {
    let calls = AtomicU32::new(0);

    let result: Result<&str, String> = with_retry(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 2 {
                    Err("temporarily degraded".to_string())
                } else {
                    Ok("recovered")
                }
            }
        },
        3,
    )
    .await;

    assert_eq!(result, Ok("recovered"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_retry_first_success_has_no_delay() {
    let start = Instant::now();

    let result: Result<u8, String> = with_retry(|| async { Ok(7) }, 3).await;

    assert_eq!(result, Ok(7));
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_still_attempts_once() {
    let calls = AtomicU32::new(0);

    let result: Result<(), String> = with_retry(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        },
        0,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_policy_custom_delays() {
    let policy = RetryPolicy {
        max_attempts: 4,
        base_delay_ms: 100,
        max_delay_ms: 250,
    };
    let start = Instant::now();

    let result: Result<(), String> =
        with_retry_policy(|| async { Err("nope".to_string()) }, &policy).await;

    assert!(result.is_err());
    // 100 + 200 + 250
    assert_eq!(start.elapsed(), Duration::from_millis(550));
}

#[tokio::test(start_paused = true)]
async fn test_safe_request_fallback_on_timeout() {
    let start = Instant::now();

    let value = safe_server_request(
        || std::future::pending::<Result<&str, String>>(),
        "fallback",
        100,
    )
    .await;

    assert_eq!(value, "fallback");
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(110));
}

#[tokio::test]
async fn test_safe_request_fallback_on_error() {
    let value = safe_server_request(
        || async { Err::<u32, _>("boom".to_string()) },
        42,
        1000,
    )
    .await;

    assert_eq!(value, 42);
}

#[tokio::test(start_paused = true)]
async fn test_safe_request_returns_fast_result() {
    let value = safe_server_request(
        || async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, String>(vec![1, 2, 3])
        },
        Vec::new(),
        100,
    )
    .await;

    assert_eq!(value, vec![1, 2, 3]);
}
