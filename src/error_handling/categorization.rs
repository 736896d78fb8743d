//! Failure categorization and retry strategy.
//!
//! This module maps transport errors and HTTP statuses onto `FailureReason`
//! and turns a `RetryPolicy` into the delay iterator consumed by `tokio_retry`.

use std::time::Duration;

use rand::Rng;

use super::types::FailureReason;
use crate::config::{RETRY_BASE_DELAY, RETRY_JITTER, RETRY_MAX_ATTEMPTS, RETRY_MULTIPLIER};

/// Timeout retry policy applied inside a single fetch.
///
/// The delay before retry `n` (0-based) is
/// `base_delay * multiplier^n + uniform(0..=jitter)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per fetch, including the initial one
    pub max_attempts: usize,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Factor applied to the delay on each further retry
    pub multiplier: f64,
    /// Upper bound of the random jitter added to each delay
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: RETRY_BASE_DELAY,
            multiplier: RETRY_MULTIPLIER,
            jitter: RETRY_JITTER,
        }
    }
}

impl RetryPolicy {
    /// A policy with the given attempt count and no waiting between attempts.
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            multiplier: 1.0,
            jitter: Duration::ZERO,
        }
    }

    /// Delay before retry `n` without jitter.
    pub fn backoff_delay(&self, n: usize) -> Duration {
        let exponent = i32::try_from(n).unwrap_or(i32::MAX);
        let nanos = self.base_delay.as_nanos() as f64 * self.multiplier.max(0.0).powi(exponent);
        if nanos >= u64::MAX as f64 {
            Duration::from_nanos(u64::MAX)
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }

    /// Delays between attempts, jitter included.
    ///
    /// Yields `max_attempts - 1` items: `tokio_retry` makes the initial
    /// attempt and one more per yielded delay.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + Send + 'static {
        let policy = self.clone();
        (0..self.max_attempts.saturating_sub(1)).map(move |n| {
            let jitter_ms = u64::try_from(policy.jitter.as_millis()).unwrap_or(u64::MAX);
            let jitter = if jitter_ms == 0 {
                Duration::ZERO
            } else {
                Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
            };
            policy.backoff_delay(n) + jitter
        })
    }
}

/// Categorizes an HTTP status code.
///
/// Returns `None` for 200 (the payload still has to be checked), `Unauthorized`
/// for 401 and `HttpStatus` for everything else.
pub fn categorize_status(status: u16) -> Option<FailureReason> {
    match status {
        200 => None,
        401 => Some(FailureReason::Unauthorized),
        other => Some(FailureReason::HttpStatus(other)),
    }
}

/// Categorizes a `reqwest::Error` into a `FailureReason`.
///
/// Timeouts are checked first since they are the only failure the fetcher
/// retries on its own. Errors carrying a status go through
/// `categorize_status`; body decode errors are malformed payloads; anything
/// else (connect, proxy tunnel, reset) is blamed on the session.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FailureReason {
    if error.is_timeout() {
        return FailureReason::Timeout;
    }
    if let Some(status) = error.status() {
        if let Some(reason) = categorize_status(status.as_u16()) {
            return reason;
        }
    }
    if error.is_decode() {
        return FailureReason::MalformedPayload(error.to_string());
    }
    FailureReason::ProxyError(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_status() {
        assert_eq!(categorize_status(200), None);
        assert_eq!(categorize_status(401), Some(FailureReason::Unauthorized));
        assert_eq!(categorize_status(429), Some(FailureReason::HttpStatus(429)));
        assert_eq!(categorize_status(204), Some(FailureReason::HttpStatus(204)));
        assert_eq!(categorize_status(502), Some(FailureReason::HttpStatus(502)));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_delays_count_is_attempts_minus_one() {
        assert_eq!(RetryPolicy::default().delays().count(), 2);
        assert_eq!(RetryPolicy::immediate(1).delays().count(), 0);
        assert_eq!(RetryPolicy::immediate(0).delays().count(), 0);
    }

    #[test]
    fn test_backoff_grows_multiplicatively() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            multiplier: 3.0,
            jitter: Duration::ZERO,
        };
        let delays: Vec<Duration> = policy.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(300),
                Duration::from_millis(900)
            ]
        );
    }

    #[test]
    fn test_jitter_stays_within_bound() {
        let policy = RetryPolicy {
            max_attempts: 50,
            base_delay: Duration::from_millis(10),
            multiplier: 1.0,
            jitter: Duration::from_millis(20),
        };
        for delay in policy.delays() {
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(30));
        }
    }
}
