//! Detail API client
//!
//! Per-title metadata (`GET /titles/{id}`), notably the poster image.

use futures::future::join_all;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::client::{HttpClient, StatusMessages};
use crate::config::{Config, DEFAULT_IMDB_API};
use crate::error::{Error, Result};
use crate::models::MovieDetail;
use crate::validators::is_valid_imdb_id;

const MESSAGES: StatusMessages = StatusMessages {
    not_found: "Movie not found",
    fallback: "Failed to fetch movie details",
};

const INVALID_DATA: &str = "Invalid movie data received";

/// Detail API client
#[derive(Debug, Clone)]
pub struct ImdbClient {
    http: HttpClient,
}

impl Default for ImdbClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ImdbClient {
    /// Create a client against the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_IMDB_API)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            http: HttpClient::with_timeout(config.imdb_api_url(), config.timeout())
                .with_retry(config.retry_limit(), super::client::DEFAULT_BACKOFF),
        }
    }

    /// Override the retry policy
    pub fn with_retry(mut self, limit: u32, backoff: Duration) -> Self {
        self.http = self.http.with_retry(limit, backoff);
        self
    }

    /// Get details for one title
    ///
    /// # Errors
    /// - `Error::Validation` - `imdb_id` is not `tt` + 7 or more digits (no request is made)
    /// - `Error::Api` - terminal HTTP failure, network failure, or an `errorMessage` in the body
    /// - `Error::DataFormat` - the body is not a detail record
    pub async fn movie_details(&self, imdb_id: &str) -> Result<MovieDetail> {
        if !is_valid_imdb_id(imdb_id) {
            return Err(Error::validation(format!("Invalid IMDb ID format: {}", imdb_id)));
        }

        let endpoint = format!("/titles/{}", urlencoding::encode(imdb_id));
        let body = self.http.get_text(&endpoint, &MESSAGES).await?;
        parse_detail(body)
    }

    /// Get details for many titles concurrently
    ///
    /// Output is aligned with `imdb_ids`; a failed lookup yields `None` for
    /// that slot only. Waits for every request to settle.
    pub async fn multiple_movie_details(&self, imdb_ids: &[String]) -> Vec<Option<MovieDetail>> {
        let requests = imdb_ids.iter().map(|id| async move {
            match self.movie_details(id).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    warn!("Details for {} unavailable: {}", id, e);
                    None
                }
            }
        });

        join_all(requests).await
    }
}

fn parse_detail(body: String) -> Result<MovieDetail> {
    let value: Value = serde_json::from_str(&body).map_err(|e| {
        debug!("Detail response is not JSON: {}", e);
        Error::data_format(INVALID_DATA)
    })?;

    // The API reports some failures in-band with a 200
    if let Some(msg) = value
        .get("errorMessage")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        return Err(Error::Api {
            message: msg.to_string(),
            status: Some(404),
            body: Some(body),
        });
    }

    let detail: MovieDetail = serde_json::from_value(value).map_err(|e| {
        debug!("Detail response rejected: {}", e);
        Error::data_format(INVALID_DATA)
    })?;

    if let Some(url) = detail.image_url() {
        if Url::parse(url).is_err() {
            debug!("Detail response rejected: bad image url {:?}", url);
            return Err(Error::data_format(INVALID_DATA));
        }
    }

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detail_with_image() {
        let body = r#"{
            "id": "tt0133093",
            "primaryTitle": "The Matrix",
            "startYear": 1999,
            "primaryImage": {"url": "https://m.media-amazon.com/images/matrix.jpg", "width": 800, "height": 1200}
        }"#;
        let detail = parse_detail(body.to_string()).unwrap();
        assert_eq!(detail.id, "tt0133093");
        assert_eq!(
            detail.image_url(),
            Some("https://m.media-amazon.com/images/matrix.jpg")
        );
    }

    #[test]
    fn test_parse_detail_error_message_is_not_found() {
        let body = r#"{"id": "tt0000001", "errorMessage": "Title not found"}"#;
        let err = parse_detail(body.to_string()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Title not found");
        assert_eq!(err.body(), Some(body));
    }

    #[test]
    fn test_parse_detail_empty_error_message_is_ignored() {
        let body = r#"{"id": "tt0000001", "errorMessage": ""}"#;
        assert!(parse_detail(body.to_string()).is_ok());
    }

    #[test]
    fn test_parse_detail_rejects_bad_shapes() {
        assert!(matches!(
            parse_detail(r#"{"primaryTitle": "No id"}"#.to_string()),
            Err(Error::DataFormat(_))
        ));
        assert!(matches!(
            parse_detail(r#"{"id": "tt0000001", "primaryImage": {"url": "not a url"}}"#.to_string()),
            Err(Error::DataFormat(_))
        ));
        assert!(matches!(
            parse_detail("<html>".to_string()),
            Err(Error::DataFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_id_fails_before_request() {
        // Unroutable base URL: a request would surface as a network error
        let client = ImdbClient::with_base_url("http://127.0.0.1:9");
        let err = client.movie_details("tt123").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
