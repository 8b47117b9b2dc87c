//! Bounded retry with per-attempt timeouts and a fixed backoff.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::config::ImageConfig;

/// How many times to try an operation and how long each try may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; at least one.
    pub max_attempts: u32,
    pub first_attempt_timeout: Duration,
    pub retry_timeout: Duration,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, first_attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            first_attempt_timeout,
            retry_timeout: first_attempt_timeout,
            backoff: Duration::ZERO,
        }
    }

    pub fn with_retry_timeout(mut self, retry_timeout: Duration) -> Self {
        self.retry_timeout = retry_timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Policy for image requests: one attempt plus the configured retries.
    pub fn for_images(config: &ImageConfig) -> Self {
        Self::new(config.max_retries + 1, config.first_attempt_timeout())
            .with_retry_timeout(config.retry_timeout())
            .with_backoff(config.backoff())
    }

    /// Policy for the warm-up probe: same attempts and backoff, shorter timeout.
    pub fn for_probe(config: &ImageConfig) -> Self {
        Self::new(config.max_retries + 1, config.warm_up_timeout()).with_backoff(config.backoff())
    }

    /// Timeout for a 1-based attempt number.
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            self.first_attempt_timeout
        } else {
            self.retry_timeout
        }
    }

    /// Runs `operation` until it succeeds or the attempts run out.
    ///
    /// The closure receives the 1-based attempt number. Every failure, a
    /// timeout included, is retried.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let limit = self.timeout_for(attempt);
            let failure = match timeout(limit, operation(attempt)).await {
                Ok(Ok(value)) => {
                    if attempt > 1 {
                        tracing::debug!(label, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Ok(Err(err)) => AttemptFailure::Failed(err),
                Err(_) => AttemptFailure::TimedOut(limit),
            };

            tracing::warn!(label, attempt, max_attempts, error = %failure, "attempt failed");

            if attempt >= max_attempts {
                return Err(RetryError {
                    attempts: attempt,
                    last: failure,
                });
            }
            if !self.backoff.is_zero() {
                sleep(self.backoff).await;
            }
            attempt += 1;
        }
    }
}

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure<E> {
    TimedOut(Duration),
    Failed(E),
}

impl<E: std::fmt::Display> std::fmt::Display for AttemptFailure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::TimedOut(limit) => write!(f, "timed out after {:?}", limit),
            AttemptFailure::Failed(err) => write!(f, "{}", err),
        }
    }
}

/// All attempts failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryError<E> {
    pub attempts: u32,
    pub last: AttemptFailure<E>,
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gave up after {} attempt(s): {}", self.attempts, self.last)
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RetryError<E> {}
