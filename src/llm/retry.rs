use crate::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A wrapper around any `LlmCaller` that retries transient failures
/// with exponential back-off.
pub struct RetryingLlmCaller {
    inner:       Arc<dyn super::LlmCaller>,
    max_retries: u32,
    base_delay:  Duration,
}

impl RetryingLlmCaller {
    pub fn new(inner: Arc<dyn super::LlmCaller>, max_retries: u32) -> Self {
        Self { inner, max_retries, base_delay: Duration::from_secs(1) }
    }

    /// Delay before the first retry; doubles after each failure.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay; self
    }

    pub(crate) fn is_auth_error(err: &str) -> bool {
        let lower = err.to_lowercase();
        lower.contains("401")
            || lower.contains("403")
            || lower.contains("authentication")
            || lower.contains("unauthorized")
            || lower.contains("forbidden")
            || lower.contains("invalid api key")
    }

    pub(crate) fn is_rate_limit_error(err: &str) -> bool {
        let lower = err.to_lowercase();
        lower.contains("429")
            || lower.contains("rate limit")
            || lower.contains("too many requests")
            || lower.contains("limit exceeded")
    }

    fn delay_for(&self, attempt: u32, rate_limited: bool) -> Duration {
        let base = if rate_limited { self.base_delay * 5 } else { self.base_delay };
        std::cmp::min(base * 2u32.saturating_pow(attempt), Duration::from_secs(60))
    }
}

#[async_trait]
impl super::LlmCaller for RetryingLlmCaller {
    async fn call(&self, request: &LlmRequest) -> Result<LlmResponse, String> {
        let mut last_err = String::new();
        let mut rate_limited = false;

        for attempt in 0..=self.max_retries {
            match self.inner.call(request).await {
                Ok(resp) => return Ok(resp),
                Err(e) if Self::is_auth_error(&e) => {
                    tracing::error!(error = %e, "LLM auth error — not retrying");
                    return Err(e);
                }
                Err(e) => {
                    let limited = Self::is_rate_limit_error(&e);
                    rate_limited |= limited;
                    last_err = e;

                    if attempt < self.max_retries {
                        let wait = self.delay_for(attempt, limited);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max     = self.max_retries,
                            wait_ms = wait.as_millis() as u64,
                            error   = %last_err,
                            "LLM transient error — retrying"
                        );
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        let prefix = if rate_limited {
            "LLM RATE LIMIT EXCEEDED"
        } else {
            "LLM failed"
        };

        Err(format!(
            "{} after {} retries — last error: {}",
            prefix, self.max_retries, last_err
        ))
    }
}
