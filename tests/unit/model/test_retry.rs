use msc_client::application::config::RetrySettings;
use msc_client::error::{AppError, ErrorKind};
use msc_client::model::retry::RetryPolicy;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[test]
fn test_retry_policy_default() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.delay, Duration::from_millis(500));
    assert!(policy.is_retryable(&AppError::Timeout));
    assert!(policy.is_retryable(&AppError::ServiceUnavailable(StatusCode::SERVICE_UNAVAILABLE)));
    assert!(!policy.is_retryable(&AppError::AuthenticationFailed));
    assert!(!policy.is_retryable(&AppError::BadRequest("x".to_string())));
}

#[test]
fn test_retry_policy_from_settings() {
    let policy = RetryPolicy::from(&RetrySettings {
        max_attempts: 3,
        delay_ms: 50,
    });
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay, Duration::from_millis(50));
}

#[test]
fn test_zero_attempts_means_one() {
    assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_waits_between_attempts() {
    let policy = RetryPolicy::new(3, Duration::from_secs(2));
    let counter = AtomicU32::new(0);
    let calls = &counter;
    let start = tokio::time::Instant::now();

    let result: Result<(), _> = policy
        .run(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::ServiceUnavailable(StatusCode::BAD_GATEWAY))
        })
        .await;

    assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert!(start.elapsed() >= Duration::from_secs(4));
}

#[tokio::test]
async fn test_none_policy_never_retries() {
    let policy = RetryPolicy::none();
    let counter = AtomicU32::new(0);
    let calls = &counter;

    let result: Result<(), _> = policy
        .run(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::Timeout)
        })
        .await;

    assert!(result.is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_custom_retry_kinds() {
    let policy = RetryPolicy::new(4, Duration::ZERO).retrying(&[ErrorKind::NotFound]);
    let counter = AtomicU32::new(0);
    let calls = &counter;

    let result = policy
        .run(move || async move {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 => Err(AppError::NotFound),
                _ => Ok(7),
            }
        })
        .await;

    assert_eq!(result.unwrap(), 7);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}
