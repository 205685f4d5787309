//! Post delivery with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`DeliverAsync`]: Core trait for sending post text to a platform API
//! - [`RetryDeliver`]: Decorator that adds retry logic to any `DeliverAsync`
//! - [`HttpStatusError`]: Non-success HTTP response, used to tell transient
//!   failures from permanent ones
//!
//! # Retry Strategy
//!
//! - Maximum 3 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay
//! - Client errors (4xx other than 429) are returned immediately

use rand::{Rng, rng};
use reqwest::StatusCode;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for async delivery of a post to a platform.
pub trait DeliverAsync {
    /// Send `text` and return the platform's identifier for the new post,
    /// if it reports one.
    async fn deliver(&self, text: &str) -> Result<Option<String>, Box<dyn Error>>;
}

/// A platform API answered with a non-success status.
#[derive(Debug)]
pub struct HttpStatusError {
    pub platform: &'static str,
    pub status: StatusCode,
    pub body: String,
}

impl HttpStatusError {
    /// Server errors and rate limiting are worth retrying; other client
    /// errors will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        self.status.is_server_error() || self.status == StatusCode::TOO_MANY_REQUESTS
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} API returned {}: {}", self.platform, self.status, self.body)
    }
}

impl Error for HttpStatusError {}

/// Whether an error from [`DeliverAsync::deliver`] should be retried.
///
/// Transport errors (timeouts, connection resets) are retried; HTTP status
/// errors defer to [`HttpStatusError::is_retryable`].
pub fn is_retryable(e: &(dyn Error + 'static)) -> bool {
    match e.downcast_ref::<HttpStatusError>() {
        Some(status_error) => status_error.is_retryable(),
        None => true,
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`DeliverAsync`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..max_jitter)
/// ```
pub struct RetryDeliver<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
    max_jitter: Duration,
}

impl<T> RetryDeliver<T>
where
    T: DeliverAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
            max_jitter: Duration::from_millis(250),
        }
    }

    #[cfg(test)]
    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    #[cfg(test)]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(31) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=self.max_jitter.as_millis() as u64);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryDeliver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryDeliver")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> DeliverAsync for RetryDeliver<T>
where
    T: DeliverAsync,
{
    #[instrument(level = "info", skip_all)]
    async fn deliver(&self, text: &str) -> Result<Option<String>, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.deliver(text).await {
                Ok(id) => return Ok(id),
                Err(e) => {
                    attempt += 1;
                    let elapsed_ms_attempt = attempt_t0.elapsed().as_millis();
                    let elapsed_ms_total = total_t0.elapsed().as_millis();

                    if !is_retryable(e.as_ref()) {
                        error!(attempt, elapsed_ms_total, error = %e, "deliver() failed permanently");
                        return Err(e);
                    }

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt,
                            elapsed_ms_total,
                            error = %e,
                            "deliver() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt,
                        elapsed_ms_total,
                        ?delay,
                        error = %e,
                        "deliver() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
