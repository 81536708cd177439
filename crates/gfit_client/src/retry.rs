use rand::{Rng, rng};
use std::time::Duration;

/// A simple retry policy with exponential backoff and jitter.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub async fn retry_async<F, Fut, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        self.retry_async_when(f, |_| true).await
    }

    /// Like [`RetryPolicy::retry_async`], but gives up at once on errors
    /// for which `should_retry` returns false.
    pub async fn retry_async_when<F, Fut, T, E, P>(&self, mut f: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    tokio::time::sleep(self.delay_for(attempt)).await;
                }
            }
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        // exponential backoff with jitter
        let max_delay = self.base_delay * (1u32 << attempt.min(16));
        let max_millis = max_delay.as_millis() as u64;
        if max_millis == 0 {
            return Duration::ZERO;
        }
        let mut rng = rng();
        Duration::from_millis(rng.random_range(0..max_millis))
    }
}
