//! Exponential backoff around calls to the generative service.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::service::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first failure.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Same schedule shape with no real waiting. Used by tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(1),
            multiplier: 1,
        }
    }

    /// The sleeps taken between attempts, in order, if every attempt fails.
    pub fn delays(&self) -> Vec<Duration> {
        let mut delay = self.initial_delay;
        let mut delays = Vec::with_capacity(self.max_retries as usize);
        for _ in 0..self.max_retries {
            delays.push(delay);
            delay = delay.saturating_mul(self.multiplier);
        }
        delays
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the retries run out. The last error is returned.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let mut delays = self.delays().into_iter();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation = operation_name, attempt, "AI call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_retryable() => match delays.next() {
                    Some(delay) => {
                        warn!(
                            operation = operation_name,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "AI call failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        warn!(operation = operation_name, attempt, error = %err, "AI call failed, giving up");
                        return Err(err);
                    }
                },
                Err(err) => {
                    warn!(operation = operation_name, error = %err, "AI call failed");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> ServiceError {
        ServiceError::Http {
            status: 503,
            message: "overloaded".into(),
        }
    }

    #[test]
    fn default_schedule_doubles_from_one_second() {
        let delays = RetryPolicy::default().delays();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
            ]
        );
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let mut calls = 0;
        let result = RetryPolicy::immediate(3)
            .run("test", || {
                calls += 1;
                let n = calls;
                async move { if n < 3 { Err(unavailable()) } else { Ok(n) } }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn surfaces_the_last_error_after_all_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::immediate(3)
            .run("test", || {
                calls += 1;
                async { Err(unavailable()) }
            })
            .await;

        assert_eq!(result, Err(unavailable()));
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::immediate(3)
            .run("test", || {
                calls += 1;
                async { Err(ServiceError::NotConfigured("no key".into())) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
