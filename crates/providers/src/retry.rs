use crate::error::{ProviderError, Result};
use std::future::Future;
use std::time::Duration;

/// Exponential backoff for transient collaborator failures.
///
/// Attempt `n` (zero-based) sleeps `initial_delay * 2^n` before the next
/// try. Configuration and malformed-response errors fail on first sight.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// A single attempt and no waiting; what hermetic tests want.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt)
    }
}

/// Runs `call` under `policy`, retrying only transient errors.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = ProviderError::Transient("no attempts made".to_string());
    for attempt in 0..attempts {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) => {
                if attempt + 1 < attempts {
                    let delay = policy.delay_for(attempt);
                    log::warn!(
                        "Transient provider error on attempt {}/{}: {err}. Retrying in {:?}",
                        attempt + 1,
                        attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                last_error = err;
            }
        }
    }
    Err(last_error)
}
