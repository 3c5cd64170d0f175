//! Retry policy for upstream calls.
//!
//! Wraps one fallible async operation and retries it on transient failures
//! with exponential backoff. Permanent failures propagate immediately; after
//! the attempt budget is spent the last failure is surfaced unchanged.

use std::num::NonZeroU32;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::ProviderError;

/// Bounded exponential backoff configuration.
///
/// `max_attempts` counts the initial attempt, so the default of 3 means one
/// call plus up to two retries. A zero budget is unrepresentable.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::new(3).unwrap(),
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total attempt budget (initial attempt included).
    pub const fn with_max_attempts(mut self, max_attempts: NonZeroU32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the first retry.
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Cap the delay between retries.
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// Delay before the retry following attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        Duration::from_millis(millis as u64).min(self.max_delay)
    }

    /// Run `operation`, retrying transient failures.
    ///
    /// The operation is invoked at least once. If a cancellation token is
    /// given, a pending backoff wait is interrupted and the call surfaces
    /// [`ProviderError::Cancelled`]; cancellation of the in-flight request
    /// itself is the operation's responsibility.
    pub async fn run<F, Fut, T>(
        &self,
        mut operation: F,
        cancellation: Option<&CancellationToken>,
    ) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !error.is_transient() || attempt >= self.max_attempts.get() {
                        return Err(error);
                    }

                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        target: "llm",
                        attempt,
                        max_attempts = self.max_attempts.get(),
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient upstream failure, backing off"
                    );

                    if let Some(token) = cancellation {
                        tokio::select! {
                            biased;
                            _ = token.cancelled() => return Err(ProviderError::Cancelled),
                            _ = sleep(delay) => {}
                        }
                    } else {
                        sleep(delay).await;
                    }
                }
            }
        }
    }
}
