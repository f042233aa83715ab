//! Retry policy for establishing dependency connections.

use backoff::ExponentialBackoff;
use std::future::Future;
use std::time::Duration;
use tracing::warn;
use userdir_core::DirectoryError;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Give up once this much time has passed since the first attempt.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            max_elapsed: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy that stops retrying after `max_elapsed`.
    #[must_use]
    pub fn with_max_elapsed(max_elapsed: Duration) -> Self {
        Self {
            max_elapsed,
            ..Default::default()
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_delay,
            current_interval: self.initial_delay,
            max_interval: self.max_delay,
            multiplier: self.multiplier,
            max_elapsed_time: Some(self.max_elapsed),
            ..ExponentialBackoff::default()
        }
    }

    /// Executes `f` until it succeeds, fails permanently, or the policy runs out.
    ///
    /// Only errors reporting [`DirectoryError::is_retriable`] are retried.
    pub async fn execute<F, Fut, T>(&self, operation: &str, mut f: F) -> Result<T, DirectoryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DirectoryError>>,
    {
        backoff::future::retry_notify(
            self.backoff(),
            || {
                let fut = f();
                async move {
                    fut.await.map_err(|e| {
                        if e.is_retriable() {
                            backoff::Error::transient(e)
                        } else {
                            backoff::Error::permanent(e)
                        }
                    })
                }
            },
            |e: DirectoryError, wait: Duration| {
                warn!("{} failed, retrying in {:?}: {}", operation, wait, e);
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
            max_elapsed: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn test_retry_success() {
        let result = fast_policy().execute("connect", || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_eventual_success() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = fast_policy()
            .execute("connect", || {
                let attempts = attempts_clone.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(DirectoryError::Database("connection refused".into()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<(), _> = fast_policy()
            .execute("connect", || {
                let attempts = attempts_clone.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(DirectoryError::Configuration("bad url".into()))
                }
            })
            .await;

        assert!(matches!(result, Err(DirectoryError::Configuration(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_elapsed() {
        let result: Result<(), _> = fast_policy()
            .execute("connect", || async { Err(DirectoryError::Cache("down".into())) })
            .await;

        assert!(matches!(result, Err(DirectoryError::Cache(_))));
    }
}
