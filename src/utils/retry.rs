//! Timeout-only retry driver.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio_retry::RetryIf;

use crate::error_handling::{FailureReason, RetryPolicy};

/// Result of a retried operation, including the number of attempts made.
#[derive(Debug)]
pub struct RetryResult<T> {
    pub result: Result<T, FailureReason>,
    /// Attempts made, including the initial one
    pub attempts: u32,
}

/// Runs `action` until it succeeds, fails with anything but a timeout, or the
/// policy's attempts are used up.
///
/// Only `FailureReason::Timeout` is retried here. Other failures may point at
/// a bad proxy rather than a bad target, so they go back to the caller after
/// the first attempt.
pub async fn retry_timeouts<T, F, Fut>(policy: &RetryPolicy, mut action: F) -> RetryResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FailureReason>>,
{
    let attempt_count = Arc::new(AtomicU32::new(0));

    let result = RetryIf::spawn(
        policy.delays(),
        {
            let attempt_count = Arc::clone(&attempt_count);
            move || {
                attempt_count.fetch_add(1, Ordering::SeqCst);
                action()
            }
        },
        |reason: &FailureReason| matches!(reason, FailureReason::Timeout),
    )
    .await;

    RetryResult {
        result,
        attempts: attempt_count.load(Ordering::SeqCst),
    }
}
