//! End-to-end dispatch runs against mock targets.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use load_harness::config::DispatchConfig;
use load_harness::dispatch::runner::run_synthetic_load;
use load_harness::{DispatchError, Dispatcher};

mod common;

fn test_config(addr: std::net::SocketAddr) -> DispatchConfig {
    DispatchConfig {
        base_url: format!("http://{}", addr),
        max_concurrent_requests: 10,
        failure_threshold: 0.20,
        min_sample_size: 10,
        max_retry_attempts: 3,
        request_timeout_secs: 5,
        backoff_base_ms: 10,
    }
}

#[tokio::test]
async fn test_accounting_identity_on_clean_run() {
    let addr = common::start_mock_backend("{\"ok\":true}").await;

    let result = run_synthetic_load(test_config(addr), None, 30)
        .await
        .unwrap();

    assert_eq!(result.successful_requests, 30);
    assert_eq!(result.failed_requests, 0);
    assert_eq!(result.total_completed, 30);
    assert_eq!(result.total_cancelled, 0);
    assert_eq!(result.completion_rate, 1.0);
    assert_eq!(result.failure_rate, 0.0);
    assert!(!result.circuit_breaker_triggered);
    assert_eq!(result.message, "Dispatched 30 synthetic requests");
}

#[tokio::test]
async fn test_client_error_is_attempted_exactly_once() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (404, "Not Found".to_string())
        }
    })
    .await;

    let result = run_synthetic_load(test_config(addr), None, 1).await.unwrap();

    assert_eq!(result.failed_requests, 1);
    assert_eq!(result.successful_requests, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_error_exhausts_retry_budget() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (500, "Internal Server Error".to_string())
        }
    })
    .await;

    let result = run_synthetic_load(test_config(addr), None, 1).await.unwrap();

    assert_eq!(result.failed_requests, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_recovery_after_transient_failures() {
    // First two attempts 503, third succeeds: one logical success.
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                (503, "Service Unavailable".to_string())
            } else {
                (200, "recovered".to_string())
            }
        }
    })
    .await;

    let result = run_synthetic_load(test_config(addr), None, 1).await.unwrap();

    assert_eq!(result.successful_requests, 1);
    assert_eq!(result.failed_requests, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_breaker_trips_and_cancels_remaining_batches() {
    let addr = common::start_programmable_backend(|| async {
        (500, "Internal Server Error".to_string())
    })
    .await;

    let mut config = test_config(addr);
    config.max_retry_attempts = 1;

    let result = run_synthetic_load(config, None, 50).await.unwrap();

    assert!(result.circuit_breaker_triggered);
    // The first batch fills the minimum sample, trips the breaker, and
    // everything after it is cancelled.
    assert_eq!(result.total_completed, 10);
    assert_eq!(result.failed_requests, 10);
    assert_eq!(result.total_cancelled, 40);
    assert_eq!(
        result.successful_requests + result.failed_requests + result.total_cancelled,
        50
    );
    assert!(result.message.contains("stopped by circuit breaker"));
}

#[tokio::test]
async fn test_trip_hook_invoked_on_tripped_run() {
    let addr = common::start_programmable_backend(|| async {
        (500, "Internal Server Error".to_string())
    })
    .await;

    let mut config = test_config(addr);
    config.max_retry_attempts = 1;

    let fired = Arc::new(AtomicU32::new(0));
    let counter = fired.clone();
    let hook: load_harness::resilience::circuit_breaker::TripHook = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    });

    let result = run_synthetic_load(config, Some(hook), 30).await.unwrap();

    assert!(result.circuit_breaker_triggered);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tokens_reported_with_result() {
    let addr = common::start_mock_backend("ok").await;

    let result = run_synthetic_load(test_config(addr), None, 5).await.unwrap();

    assert_eq!(result.random_strings_used.len(), 3);
    for token in &result.random_strings_used {
        assert!((3..=12).contains(&token.len()), "token: {}", token);
    }
}

#[tokio::test]
async fn test_zero_request_count_rejected() {
    let addr = common::start_mock_backend("ok").await;

    let err = run_synthetic_load(test_config(addr), None, 0).await.unwrap_err();
    assert!(matches!(err, DispatchError::InvalidRequestCount(0)));
}

#[tokio::test]
async fn test_invalid_config_rejected_before_any_request() {
    let mut config = test_config("127.0.0.1:1".parse().unwrap());
    config.failure_threshold = 1.5;

    let err = Dispatcher::new(config).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_run_without_open_session_fails_fast() {
    let addr = common::start_mock_backend("ok").await;

    let mut dispatcher = Dispatcher::new(test_config(addr)).unwrap();
    let err = dispatcher.run(10).await.unwrap_err();
    assert!(matches!(err, DispatchError::SessionClosed));
}

#[tokio::test]
async fn test_session_supports_consecutive_runs() {
    let addr = common::start_mock_backend("ok").await;

    let mut dispatcher = Dispatcher::new(test_config(addr)).unwrap();
    dispatcher.open_session().unwrap();

    let first = dispatcher.run(12).await.unwrap();
    let second = dispatcher.run(8).await.unwrap();
    dispatcher.close_session();

    assert_eq!(first.successful_requests, 12);
    // The breaker resets between runs; counts never bleed over.
    assert_eq!(second.successful_requests, 8);
    assert_eq!(second.total_completed, 8);
}
