//! HTTP client abstraction.

use crate::error::FetchError;
use crate::retry::RetryStrategy;
use reqwest::{header, Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client with retry capabilities.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry_strategy: RetryStrategy,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built, which
    /// indicates a broken TLS configuration.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("viewpay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: client,
            retry_strategy: RetryStrategy::default(),
        })
    }

    /// Sets the retry strategy for this client.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Performs a GET request, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the final error once the retry budget is exhausted, or a
    /// non-retryable error immediately.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let mut attempts = 0;
        let max_attempts = self.retry_strategy.max_attempts;

        loop {
            attempts += 1;
            debug!(url = %url, attempt = attempts, "Making GET request");

            let result = self.inner.get(url).send().await;

            match result {
                Ok(response) => {
                    if response.status().is_success() {
                        return Ok(response);
                    }

                    // Handle rate limiting
                    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = response
                            .headers()
                            .get(header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse().ok());

                        if attempts < max_attempts {
                            let wait = retry_after.map_or_else(
                                || self.retry_strategy.delay_for_attempt(attempts),
                                Duration::from_secs,
                            );
                            warn!(wait_secs = wait.as_secs(), "Rate limited, backing off");
                            tokio::time::sleep(wait).await;
                            continue;
                        }

                        return Err(FetchError::RateLimited { retry_after });
                    }

                    return Err(FetchError::InvalidResponse(format!(
                        "Unexpected status code: {}",
                        response.status()
                    )));
                }
                Err(e) => {
                    if attempts < max_attempts && self.retry_strategy.should_retry(&e) {
                        let delay = self.retry_strategy.delay_for_attempt(attempts);
                        warn!(
                            error = %e,
                            delay_secs = delay.as_secs(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}
