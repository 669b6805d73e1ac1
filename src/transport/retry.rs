//! Bounded retry primitive.
//!
//! One policy type and one driver, shared by the Transport Fetcher and both
//! scrape stages so attempt counting and logging are identical everywhere.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use crate::config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};

/// Attempt budget and fixed inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, initial attempt included. Zero is treated as one.
    pub max_attempts: usize,
    /// Sleep between two consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts,
            delay,
        }
    }

    /// Delays between attempts, ready for use with `tokio_retry::Retry`.
    ///
    /// Yields `max_attempts - 1` delays, so the action runs at most
    /// `max_attempts` times and never sleeps after the final failure.
    pub fn strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.delay).take(self.max_attempts.max(1) - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// Runs `action` until it succeeds, the policy's attempt budget is spent,
/// or `retryable` rejects an error.
///
/// Every failed attempt is logged at `warn` with `label` and its attempt
/// number. Returns the first success or the last error.
pub async fn retry_with_policy<F, Fut, T, E, C>(
    policy: &RetryPolicy,
    label: &str,
    mut action: F,
    retryable: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    C: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let attempt = AtomicUsize::new(0);
    let retryable = &retryable;

    RetryIf::spawn(
        policy.strategy(),
        || {
            let n = attempt.fetch_add(1, Ordering::Relaxed) + 1;
            let fut = action();
            async move {
                fut.await.map_err(|e| {
                    if n < max_attempts && retryable(&e) {
                        log::warn!("{} failed (attempt {}/{}), retrying: {}", label, n, max_attempts, e);
                    } else {
                        log::warn!("{} failed (attempt {}/{}): {}", label, n, max_attempts, e);
                    }
                    e
                })
            }
        },
        |e: &E| retryable(e),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_strategy_yields_attempts_minus_one_delays() {
        let policy = RetryPolicy::new(3, Duration::from_millis(5));
        let delays: Vec<Duration> = policy.strategy().collect();
        assert_eq!(delays, vec![Duration::from_millis(5); 2]);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(5));
        assert_eq!(policy.strategy().count(), 0);
    }

    #[test]
    fn test_default_policy_matches_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.delay, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_retry_stops_at_first_success() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        let result: Result<usize, String> = retry_with_policy(
            &policy,
            "op",
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(format!("fail {}", n))
                    } else {
                        Ok(n)
                    }
                }
            },
            |_: &String| true,
        )
        .await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_returns_last_error_when_exhausted() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let result: Result<(), String> = retry_with_policy(
            &policy,
            "op",
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(format!("fail {}", n)) }
            },
            |_: &String| true,
        )
        .await;
        assert_eq!(result, Err("fail 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejected_error_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(200));
        let start = Instant::now();
        let result: Result<(), String> = retry_with_policy(
            &policy,
            "op",
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("permanent".to_string()) }
            },
            |e: &String| e != "permanent",
        )
        .await;
        assert_eq!(result, Err("permanent".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_retry_sleeps_between_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_millis(30));
        let start = Instant::now();
        let _: Result<(), &str> =
            retry_with_policy(&policy, "op", || async { Err("no") }, |_: &&str| true).await;
        // Two delays between three attempts
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
