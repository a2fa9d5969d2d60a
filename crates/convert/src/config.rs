//! Converter configuration.

use std::time::Duration;

/// Settings for [`HttpConverter`](crate::HttpConverter).
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// URL the presentation is POSTed to.
    pub endpoint: String,

    /// Timeout for a single request, including the response body.
    pub timeout: Duration,

    /// Additional attempts after a transient failure.
    pub max_retries: u32,

    /// Delay before the first retry; grows linearly with each attempt.
    pub retry_backoff: Duration,
}

impl ConverterConfig {
    /// Configuration for the given endpoint with default limits.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Delay before retry number `attempt` (1-based).
    pub(crate) fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(attempt)
    }
}
