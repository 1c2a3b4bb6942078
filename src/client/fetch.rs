//! Retrying Fetch
//!
//! Bounded-retry HTTP helper used for every backend read. A request that
//! comes back non-2xx (or fails in transport) is retried until the caller's
//! budget is spent; the last failure is then returned. No state survives
//! between calls.

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::error::{ClientError, ClientResult};

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Same delay before every retry
    Fixed(Duration),
    /// `base * attempt^2` before the retry that follows attempt `attempt`
    Quadratic(Duration),
}

impl RetryPolicy {
    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self {
            RetryPolicy::Fixed(delay) => *delay,
            RetryPolicy::Quadratic(base) => base.saturating_mul(attempt.saturating_mul(attempt)),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Fixed(Duration::from_millis(1000))
    }
}

/// Backoff shape as written in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    #[default]
    Fixed,
    Quadratic,
}

impl Backoff {
    pub fn with_delay(self, delay: Duration) -> RetryPolicy {
        match self {
            Backoff::Fixed => RetryPolicy::Fixed(delay),
            Backoff::Quadratic => RetryPolicy::Quadratic(delay),
        }
    }
}

/// Per-request configuration
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    /// Builder method: set the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Builder method: add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Retrying request executor
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch `url` and parse the body as JSON.
    ///
    /// Makes at most `retries + 1` attempts. A body that fails to parse is
    /// returned as [`ClientError::Parse`] without further attempts.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
        retries: u32,
    ) -> ClientResult<T> {
        let response = self.send_with_retries(url, options, retries).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch `url` and return the body as text, with the same retry rules
    /// as [`Fetcher::fetch_json`].
    pub async fn fetch_text(
        &self,
        url: &str,
        options: &RequestOptions,
        retries: u32,
    ) -> ClientResult<String> {
        let response = self.send_with_retries(url, options, retries).await?;
        Ok(response.text().await?)
    }

    async fn send_with_retries(
        &self,
        url: &str,
        options: &RequestOptions,
        retries: u32,
    ) -> ClientResult<Response> {
        let mut remaining = retries;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            tracing::debug!(url = %url, attempt, method = %options.method, "Sending request");

            let error = match self.build(url, options).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => ClientError::http(response.status()),
                Err(e) => ClientError::Network(e),
            };

            if remaining == 0 {
                tracing::debug!(url = %url, attempt, error = %error, "Retry budget exhausted");
                return Err(error);
            }
            remaining -= 1;

            let delay = self.policy.delay_after(attempt);
            tracing::warn!(
                url = %url,
                attempt,
                remaining,
                error = %error,
                "Request failed, retrying in {:?}",
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn build(&self, url: &str, options: &RequestOptions) -> reqwest::RequestBuilder {
        options
            .headers
            .iter()
            .fold(self.client.request(options.method.clone(), url), |req, (name, value)| {
                req.header(name.as_str(), value.as_str())
            })
    }
}
