use anyhow::Result;
use backoff::ExponentialBackoff;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing::warn;

/// Retry configuration for API calls
pub fn get_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(100),
        max_interval: Duration::from_secs(5),
        max_elapsed_time: Some(Duration::from_secs(30)),
        multiplier: 2.0,
        randomization_factor: 0.1,
        ..Default::default()
    }
}

/// Retry an async operation with the default exponential backoff
pub async fn retry_async<F, Fut, T, E>(operation_name: &str, max_retries: u32, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation_name, max_retries, get_backoff(), operation).await
}

/// Retry with custom backoff settings. Gives up after `max_retries`
/// attempts or when the backoff's elapsed-time budget runs out.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation_name: &str,
    max_retries: u32,
    backoff: ExponentialBackoff,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = AtomicU32::new(0);

    let result = backoff::future::retry_notify(
        backoff,
        || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            let fut = operation();
            async move {
                match fut.await {
                    Ok(value) => Ok(value),
                    Err(e) if attempt >= max_retries => Err(backoff::Error::permanent(e)),
                    Err(e) => Err(backoff::Error::transient(e)),
                }
            }
        },
        |e: E, delay: Duration| {
            warn!(
                "{} attempt {}/{} failed: {}. Retrying in {:?}",
                operation_name,
                attempts.load(Ordering::Relaxed),
                max_retries,
                e,
                delay
            );
        },
    )
    .await;

    result.map_err(|e| {
        anyhow::anyhow!(
            "{} failed after {} attempts: {}",
            operation_name,
            attempts.load(Ordering::Relaxed),
            e
        )
    })
}

/// Circuit breaker state
pub struct CircuitBreaker {
    failures: AtomicU32,
    last_failure: parking_lot::Mutex<Option<Instant>>,
    threshold: u32,
    reset_timeout: Duration,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, reset_timeout: Duration) -> Self {
        Self {
            failures: AtomicU32::new(0),
            last_failure: parking_lot::Mutex::new(None),
            threshold,
            reset_timeout,
        }
    }

    pub fn is_open(&self) -> bool {
        let failures = self.failures.load(Ordering::Relaxed);
        if failures < self.threshold {
            return false;
        }

        // Half-open once the timeout has passed
        let expired = matches!(*self.last_failure.lock(), Some(last) if last.elapsed() > self.reset_timeout);
        if expired {
            self.reset();
            return false;
        }

        true
    }

    pub fn record_success(&self) {
        self.failures.store(0, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self.last_failure.lock() = Some(Instant::now());
    }

    pub fn reset(&self) {
        self.failures.store(0, Ordering::Relaxed);
        *self.last_failure.lock() = None;
    }

    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }
}
