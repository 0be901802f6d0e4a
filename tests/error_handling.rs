use mysetrun::error::{self, RetryConfig};
use mysetrun::MysetError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn fast(attempts: usize) -> RetryConfig {
    RetryConfig {
        max_attempts: attempts,
        initial_delay: Duration::from_millis(1),
        backoff_multiplier: 2.0,
        max_delay: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn test_retry_async_eventually_succeeds() {
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
    let result = error::retry_async(
        || async {
            let a = ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            if a < 2 {
                Err(MysetError::Api {
                    status: Some(503),
                    message: "unavailable".into(),
                })
            } else {
                Ok(42u32)
            }
        },
        fast(3),
    )
    .await
    .expect("retry should succeed");
    assert_eq!(result, 42);
    assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_async_stops_on_client_error() {
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
    let result: mysetrun::Result<()> = error::retry_async(
        || async {
            ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            Err(MysetError::Api {
                status: Some(404),
                message: "not found".into(),
            })
        },
        fast(5),
    )
    .await;
    assert!(matches!(result, Err(MysetError::Api { status: Some(404), .. })));
    assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_async_gives_up_after_budget() {
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
    let result: mysetrun::Result<()> = error::retry_async(
        || async {
            ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            Err(MysetError::Api {
                status: None,
                message: "connection refused".into(),
            })
        },
        fast(2),
    )
    .await;
    assert!(result.is_err());
    assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_retryable_classification() {
    assert!(error::is_retryable_error(&MysetError::Api { status: Some(500), message: String::new() }));
    assert!(error::is_retryable_error(&MysetError::Api { status: Some(429), message: String::new() }));
    assert!(error::is_retryable_error(&MysetError::Api { status: None, message: String::new() }));
    assert!(!error::is_retryable_error(&MysetError::Api { status: Some(400), message: String::new() }));
    assert!(!error::is_retryable_error(&MysetError::Decode("bad".into())));
    assert!(!error::is_retryable_error(&MysetError::InvalidTransition("x".into())));
}

#[test]
fn test_user_friendly_messages() {
    let msg = error::user_friendly_message(&MysetError::Api {
        status: Some(403),
        message: "forbidden".into(),
    });
    assert!(msg.contains("Not signed in"));

    let msg = error::user_friendly_message(&MysetError::Api {
        status: None,
        message: "refused".into(),
    });
    assert!(msg.contains("Could not reach"));

    let msg = error::user_friendly_message(&MysetError::InvalidSet("'Row' has no set 4".into()));
    assert!(msg.contains("has no set 4"));
}

#[test]
fn test_api_error_display_includes_status() {
    let err = MysetError::Api {
        status: Some(502),
        message: "bad gateway".into(),
    };
    assert_eq!(err.to_string(), "API error (HTTP 502): bad gateway");
    let err = MysetError::Api {
        status: None,
        message: "timed out".into(),
    };
    assert_eq!(err.to_string(), "API error: timed out");
}
