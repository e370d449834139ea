//! Retry with exponential backoff

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ApiError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            backoff_multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// One try, no retries
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delays between consecutive attempts
    pub fn delays(&self) -> Vec<Duration> {
        let mut delay = self.initial_delay_ms;
        (1..self.max_attempts.max(1))
            .map(|_| {
                let current = Duration::from_millis(delay);
                delay = delay.saturating_mul(self.backoff_multiplier as u64);
                current
            })
            .collect()
    }
}

/// Run `operation` up to `max_attempts` times, sleeping between failures.
/// Returns the last error once attempts are exhausted.
pub async fn retry_with_backoff<T, Op, Fut, S, SFut>(
    policy: &RetryPolicy,
    operation: Op,
    sleep: S,
) -> Result<T, ApiError>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    retry_while(policy, operation, sleep, |_| true).await
}

/// Like [`retry_with_backoff`] but stops at the first non-retryable error
pub async fn retry_transient<T, Op, Fut, S, SFut>(
    policy: &RetryPolicy,
    operation: Op,
    sleep: S,
) -> Result<T, ApiError>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    retry_while(policy, operation, sleep, ApiError::is_retryable).await
}

async fn retry_while<T, Op, Fut, S, SFut, P>(
    policy: &RetryPolicy,
    mut operation: Op,
    sleep: S,
    should_retry: P,
) -> Result<T, ApiError>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
    P: Fn(&ApiError) -> bool,
{
    let mut delays = policy.delays().into_iter();
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let next = if should_retry(&err) { delays.next() } else { None };
                let Some(delay) = next else {
                    if attempt > 1 {
                        log::error!("[Retry] Giving up after {} attempts: {}", attempt, err);
                    }
                    return Err(err);
                };
                log::warn!(
                    "[Retry] Attempt {} failed, retrying in {}ms...",
                    attempt,
                    delay.as_millis()
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Browser timer used as the `sleep` argument
pub async fn browser_sleep(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    gloo_timers::future::sleep(delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorKind;
    use std::cell::{Cell, RefCell};

    fn recorder(log: &RefCell<Vec<u64>>) -> impl Fn(Duration) -> std::future::Ready<()> + '_ {
        move |d| {
            log.borrow_mut().push(d.as_millis() as u64);
            std::future::ready(())
        }
    }

    #[test]
    fn test_delays_grow_by_multiplier() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delays(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn test_single_attempt_has_no_delays() {
        assert!(RetryPolicy::single_attempt().delays().is_empty());
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let slept = RefCell::new(Vec::new());

        let result = retry_with_backoff(
            &RetryPolicy::default(),
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(ApiError::network("down"))
                    } else {
                        Ok(n)
                    }
                }
            },
            recorder(&slept),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(*slept.borrow(), vec![1000, 2000]);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_exhausted() {
        let calls = Cell::new(0);
        let slept = RefCell::new(Vec::new());

        let result: Result<(), ApiError> = retry_with_backoff(
            &RetryPolicy::default(),
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Err(ApiError::new(ErrorKind::Server, format!("fail {}", n))) }
            },
            recorder(&slept),
        )
        .await;

        assert_eq!(result.unwrap_err().message, "fail 3");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_transient_stops_on_validation_error() {
        let calls = Cell::new(0);
        let slept = RefCell::new(Vec::new());

        let result: Result<(), ApiError> = retry_transient(
            &RetryPolicy::default(),
            || {
                calls.set(calls.get() + 1);
                async { Err(ApiError::from_response(400, b"{\"detail\":\"bad\"}")) }
            },
            recorder(&slept),
        )
        .await;

        assert_eq!(result.unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(calls.get(), 1);
        assert!(slept.borrow().is_empty());
    }
}
