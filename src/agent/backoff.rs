//! Retry-with-backoff as a standalone pure function, independent of the
//! driver's state, so it is unit-testable against a fake fallible `op`.

use crate::error::ErrorClass;
use std::future::Future;
use std::time::Duration;

/// Retry `op` up to `max_attempts` times. Between attempts, `classify`
/// decides whether the error is worth retrying at all; a `Retryable`
/// error waits `2^attempt` seconds before the next attempt (attempt
/// numbering starts at 0), anything else returns immediately.
pub async fn attempt_with_backoff<T, E, F, Fut>(
    mut op: F,
    max_attempts: u32,
    classify: impl Fn(&E) -> ErrorClass,
    sleep: impl Fn(Duration) -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_err = None;
    for attempt in 0..max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let class = classify(&err);
                let retry = class == ErrorClass::Retryable && attempt + 1 < max_attempts;
                last_err = Some(err);
                if !retry {
                    break;
                }
                sleep(Duration::from_secs(2u64.pow(attempt))).await;
            }
        }
    }
    Err(last_err.expect("loop runs at least once for max_attempts > 0"))
}

/// `tokio::time::sleep` boxed to fit [`attempt_with_backoff`]'s `sleep` slot.
pub fn tokio_sleep(duration: Duration) -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(tokio::time::sleep(duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn no_sleep(_d: Duration) -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async {})
    }

    #[derive(Debug, PartialEq, Eq)]
    struct FakeErr(&'static str);

    #[tokio::test]
    async fn succeeds_without_retry_when_op_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FakeErr> = attempt_with_backoff(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7u32) }
            },
            3,
            |_: &FakeErr| ErrorClass::Retryable,
            no_sleep,
        )
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_up_to_max_attempts_on_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FakeErr> = attempt_with_backoff(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeErr("rate limited")) }
            },
            3,
            |_: &FakeErr| ErrorClass::Retryable,
            no_sleep,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn nonretryable_error_stops_after_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FakeErr> = attempt_with_backoff(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeErr("denied")) }
            },
            3,
            |_: &FakeErr| ErrorClass::NonRetryableDegraded,
            no_sleep,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
