//! Retry with exponential backoff for provider calls.
//!
//! Client errors fail immediately; retryable errors sleep and double the
//! delay up to a cap; an exhausted budget folds the last error into
//! [`ArbiterError::RetriesExhausted`]. A rate-limit reply carrying a
//! retry-after hint overrides a shorter computed delay.

use std::future::Future;
use std::time::Duration;

use sieve_core::config::ArbiterConfig;
use sieve_core::errors::ArbiterError;
use tracing::warn;

/// Backoff schedule for one logical operation.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub max_retries: u32,
    pub initial: Duration,
    pub max: Duration,
}

impl BackoffPolicy {
    pub fn from_config(config: &ArbiterConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial: Duration::from_millis(config.initial_backoff_ms),
            max: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

/// Run `op` until it succeeds, fails non-retryably, or the budget runs
/// out. `op` receives the zero-based attempt number.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: BackoffPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, ArbiterError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ArbiterError>>,
{
    let mut backoff = policy.initial;
    let mut last_error: Option<ArbiterError> = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let wait = match &last_error {
                Some(ArbiterError::RateLimited {
                    retry_after_ms: Some(ms),
                }) => backoff.max(Duration::from_millis(*ms)),
                _ => backoff,
            };
            tokio::time::sleep(wait).await;
            backoff = (backoff * 2).min(policy.max);
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                warn!(operation, attempt, error = %e, "retryable arbiter failure");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(ArbiterError::RetriesExhausted {
        attempts: policy.max_retries + 1,
        last_error: last_error.map_or_else(|| "unknown".to_string(), |e| e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_retries: u32) -> BackoffPolicy {
        BackoffPolicy {
            max_retries,
            initial: Duration::from_millis(100),
            max: Duration::from_millis(400),
        }
    }

    fn network() -> ArbiterError {
        ArbiterError::Network {
            reason: "connection refused".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_needs_no_retry() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(policy(3), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_errors_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(policy(3), "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(network())
                } else {
                    Ok("done")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_fail_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(policy(3), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ArbiterError::RequestFailed {
                    status: 401,
                    reason: "bad key".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(
            result.unwrap_err(),
            ArbiterError::RequestFailed { status: 401, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_reports_attempts_and_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(policy(2), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ArbiterError::Timeout { elapsed_ms: 60_000 })
            }
        })
        .await;
        match result.unwrap_err() {
            ArbiterError::RetriesExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("timed out"));
            }
            other => panic!("expected RetriesExhausted, got {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_doubles_and_caps() {
        let start = tokio::time::Instant::now();
        let _: Result<(), _> =
            retry_with_backoff(policy(4), "test", |_| async { Err(network()) }).await;
        // 100 + 200 + 400 + 400 (capped) = 1100ms of virtual sleep.
        assert_eq!(start.elapsed(), Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_hint_overrides_shorter_backoff() {
        let start = tokio::time::Instant::now();
        let result = retry_with_backoff(policy(3), "test", |attempt| async move {
            if attempt == 0 {
                Err(ArbiterError::RateLimited {
                    retry_after_ms: Some(5_000),
                })
            } else {
                Ok(())
            }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(start.elapsed(), Duration::from_millis(5_000));
    }
}
