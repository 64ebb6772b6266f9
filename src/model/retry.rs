/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::application::config::RetrySettings;
use crate::error::{AppError, ErrorKind};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Which failures of a call are retried, how often and how far apart
///
/// Only kinds listed in `retry_on` are retried. Everything else, and in
/// particular [`ErrorKind::AuthenticationFailed`], is returned at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay between attempts
    pub delay: Duration,
    /// Error kinds worth another attempt
    pub retry_on: HashSet<ErrorKind>,
}

impl RetryPolicy {
    /// Policy retrying transient failures
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            retry_on: [
                ErrorKind::ServiceUnavailable,
                ErrorKind::Network,
                ErrorKind::Timeout,
            ]
            .into_iter()
            .collect(),
        }
    }

    /// Policy performing a single attempt
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
            retry_on: HashSet::new(),
        }
    }

    /// Replaces the retryable kinds
    #[must_use]
    pub fn retrying(mut self, kinds: &[ErrorKind]) -> Self {
        self.retry_on = kinds.iter().copied().collect();
        self
    }

    /// `true` when `error` may be retried under this policy
    #[must_use]
    pub fn is_retryable(&self, error: &AppError) -> bool {
        self.retry_on.contains(&error.kind())
    }

    /// Runs `operation` until it succeeds, fails with a non retryable error
    /// or runs out of attempts
    ///
    /// # Arguments
    ///
    /// * `operation` - Closure producing a fresh future for every attempt
    ///
    /// # Returns
    ///
    /// The first success, or the last error
    ///
    /// # Example
    ///
    /// ```
    /// use msc_client::error::AppError;
    /// use msc_client::model::retry::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let policy = RetryPolicy::new(3, Duration::ZERO);
    /// let result: Result<u32, AppError> = policy.run(|| async { Ok(7) }).await;
    /// assert_eq!(result.unwrap(), 7);
    /// # });
    /// ```
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && self.is_retryable(&e) => {
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, self.max_attempts, e, self.delay
                    );
                    attempt += 1;
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings {
            max_attempts: crate::constants::DEFAULT_MAX_ATTEMPTS,
            delay_ms: crate::constants::DEFAULT_RETRY_DELAY_MS,
        })
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, Duration::from_millis(settings.delay_ms))
    }
}
