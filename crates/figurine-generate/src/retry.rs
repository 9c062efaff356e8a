use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use figurine_config::RetryConfig;

/// Bounded exponential backoff without jitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: u32,
}

/// Value produced by a successful attempt, with the attempt count it took
#[derive(Debug)]
pub struct Retried<T> {
    pub value: T,
    pub attempts: u32,
}

/// Why the retry loop gave up
#[derive(Debug)]
pub enum RetryError<E> {
    /// A non-transient failure stopped the loop early
    Aborted { attempts: u32, error: E },
    /// Every attempt failed transiently
    Exhausted { attempts: u32, last: E },
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            multiplier: multiplier.max(1),
        }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// `op` receives the 1-based attempt number. Attempts are strictly
    /// sequential: the next one starts only after the previous failure was
    /// classified by `is_transient` and its backoff delay elapsed.
    pub async fn run<T, E, F, Fut>(&self, is_transient: impl Fn(&E) -> bool, mut op: F) -> Result<Retried<T>, RetryError<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;

        loop {
            let error = match op(attempt).await {
                Ok(value) => {
                    return Ok(Retried {
                        value,
                        attempts: attempt,
                    });
                }
                Err(error) => error,
            };

            if !is_transient(&error) {
                return Err(RetryError::Aborted {
                    attempts: attempt,
                    error,
                });
            }

            if attempt >= self.max_attempts {
                tracing::warn!(attempts = attempt, error = %error, "giving up after transient failures");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let delay = self.delay_after(attempt);
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "transient failure, retrying"
            );

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.initial_delay, config.multiplier)
    }
}
