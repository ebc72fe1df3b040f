//! Exponential backoff for side effects.

use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

/// How often, and how patiently, a failed effect is retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Upper bound on any single delay.
    pub max_delay: Duration,

    /// Growth factor between consecutive delays.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without waiting.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Delay before retry number `attempt` (zero-based), capped at `max_delay`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let seconds = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);

        Duration::try_from_secs_f64(seconds)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Run `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or the policy runs out of retries. The last error is returned.
///
/// # Errors
///
/// Returns the final error from `operation`.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(attempt, "succeeded after retry");
                }

                return Ok(value);
            }
            Err(error) if attempt >= policy.max_retries || !is_retryable(&error) => {
                return Err(error);
            }
            Err(error) => {
                let delay = policy.delay_for_attempt(attempt);

                warn!(
                    attempt,
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "attempt failed, retrying"
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn delays_grow_until_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            multiplier: 2.0,
        };

        let delays: Vec<_> = (0..5).map(|attempt| policy.delay_for_attempt(attempt)).collect();

        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(500),
                Duration::from_millis(500),
            ],
            "delays double then stop at the cap"
        );
    }

    #[test]
    fn huge_exponents_fall_back_to_the_cap() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(u32::MAX), policy.max_delay);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);

        let result = retry_with_backoff(&RetryPolicy::immediate(3), |_: &String| true, || {
            let call = calls.fetch_add(1, Ordering::SeqCst);

            async move {
                if call < 2 {
                    Err(format!("attempt {call} failed"))
                } else {
                    Ok(call)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> =
            retry_with_backoff(&RetryPolicy::immediate(2), |_: &String| true, || {
                calls.fetch_add(1, Ordering::SeqCst);

                async { Err("still down".to_owned()) }
            })
            .await;

        assert_eq!(result, Err("still down".to_owned()));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "one attempt plus two retries");
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> =
            retry_with_backoff(&RetryPolicy::immediate(5), |error: &String| error != "bad row", || {
                calls.fetch_add(1, Ordering::SeqCst);

                async { Err("bad row".to_owned()) }
            })
            .await;

        assert!(result.is_err(), "the error is surfaced");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
