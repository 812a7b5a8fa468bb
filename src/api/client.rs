//! Shared HTTP plumbing for the API gateways
//!
//! Both gateways issue plain GETs with the same timeout and the same
//! retry policy; only the wording of their failure messages differs.
//! The timeout covers the whole call, retries and their waits included.

use reqwest::header::RETRY_AFTER;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{DEFAULT_RETRY_LIMIT, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};

/// Statuses worth another attempt
pub const RETRY_STATUS_CODES: [u16; 7] = [408, 413, 429, 500, 502, 503, 504];

/// First retry delay; doubles on every further attempt
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(300);

/// Per-API wording for terminal HTTP failures
#[derive(Debug, Clone, Copy)]
pub struct StatusMessages {
    pub not_found: &'static str,
    pub fallback: &'static str,
}

impl StatusMessages {
    pub const RATE_LIMITED: &'static str = "Too many requests. Please try again later";
    pub const SERVER_ERROR: &'static str = "Server error. Please try again later";

    /// Pick the user-facing message for a terminal status
    pub fn for_status(&self, status: u16) -> &'static str {
        match status {
            404 => self.not_found,
            429 => Self::RATE_LIMITED,
            s if s >= 500 => Self::SERVER_ERROR,
            _ => self.fallback,
        }
    }
}

/// GET-only client with transient-status retries
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    retry_limit: u32,
    backoff: Duration,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            timeout,
            retry_limit: DEFAULT_RETRY_LIMIT,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Override the retry policy (tests use a zero backoff)
    pub fn with_retry(mut self, limit: u32, backoff: Duration) -> Self {
        self.retry_limit = limit;
        self.backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `endpoint` and return the body of a 2xx response
    ///
    /// Retries up to `retry_limit` times on [`RETRY_STATUS_CODES`], honoring
    /// `Retry-After` when the server sends one. The whole call, waits
    /// included, is bounded by the client timeout; a wait that would
    /// overrun it ends the call with the last status instead.
    ///
    /// # Errors
    /// - `Error::Api` with a status for terminal non-2xx responses
    /// - `Error::Api` without a status when no response was received in time
    pub async fn get_text(&self, endpoint: &str, messages: &StatusMessages) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        let deadline = Instant::now() + self.timeout;

        let request = self.get_with_retries(&url, messages, deadline);
        match tokio::time::timeout_at(deadline, request).await {
            Ok(result) => result,
            Err(_) => {
                warn!("GET {} gave up after {:?}", url, self.timeout);
                Err(Error::network())
            }
        }
    }

    async fn get_with_retries(
        &self,
        url: &str,
        messages: &StatusMessages,
        deadline: Instant,
    ) -> Result<String> {
        let mut retries = 0;

        loop {
            debug!("GET {}", url);
            let response = match self
                .client
                .get(url)
                .header("Accept", "application/json")
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    debug!("GET {} failed: {}", url, e);
                    return Err(Error::network());
                }
            };

            let status = response.status();
            if status.is_success() {
                return response.text().await.map_err(|e| {
                    debug!("Reading body of {} failed: {}", url, e);
                    Error::network()
                });
            }

            let code = status.as_u16();
            if RETRY_STATUS_CODES.contains(&code) && retries < self.retry_limit {
                // Get Retry-After header or default to exponential backoff
                let wait = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| self.backoff * 2u32.pow(retries));

                if Instant::now() + wait < deadline {
                    retries += 1;
                    warn!(
                        "GET {} returned {}, retry {}/{} in {:?}",
                        url, code, retries, self.retry_limit, wait
                    );
                    tokio::time::sleep(wait).await;
                    continue;
                }
                warn!(
                    "GET {} returned {}, not retrying: {:?} wait exceeds the timeout",
                    url, code, wait
                );
            }

            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(Error::Api {
                message: messages.for_status(code).to_string(),
                status: Some(code),
                body,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGES: StatusMessages = StatusMessages {
        not_found: "Nothing here",
        fallback: "Request failed",
    };

    #[test]
    fn test_message_by_status_class() {
        assert_eq!(MESSAGES.for_status(404), "Nothing here");
        assert_eq!(MESSAGES.for_status(429), StatusMessages::RATE_LIMITED);
        assert_eq!(MESSAGES.for_status(500), StatusMessages::SERVER_ERROR);
        assert_eq!(MESSAGES.for_status(503), StatusMessages::SERVER_ERROR);
        assert_eq!(MESSAGES.for_status(400), "Request failed");
        assert_eq!(MESSAGES.for_status(401), "Request failed");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpClient::new("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.retry_limit(), 2);
    }

    #[test]
    fn test_timeout_from_constructor() {
        let client = HttpClient::with_timeout("http://localhost", Duration::from_secs(3));
        assert_eq!(client.timeout(), Duration::from_secs(3));
        assert_eq!(
            HttpClient::new("http://localhost").timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) is essentially never listening on loopback
        let client = HttpClient::new("http://127.0.0.1:9").with_retry(0, Duration::ZERO);
        let err = client.get_text("/anything", &MESSAGES).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), Error::NETWORK_MESSAGE);
    }
}
