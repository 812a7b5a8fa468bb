//! Title-search API client
//!
//! Paged search over movie titles: `GET /movies/search?Title=..&page=..`.

use std::time::Duration;
use tracing::debug;

use super::client::{HttpClient, StatusMessages};
use crate::config::{Config, DEFAULT_MOVIES_API};
use crate::error::{Error, Result};
use crate::models::MoviesPage;

const MESSAGES: StatusMessages = StatusMessages {
    not_found: "No movies found",
    fallback: "Failed to search movies",
};

/// Title-search API client
#[derive(Debug, Clone)]
pub struct MoviesClient {
    http: HttpClient,
}

impl Default for MoviesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MoviesClient {
    /// Create a client against the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_MOVIES_API)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            http: HttpClient::with_timeout(config.movies_api_url(), config.timeout())
                .with_retry(config.retry_limit(), super::client::DEFAULT_BACKOFF),
        }
    }

    /// Override the retry policy
    pub fn with_retry(mut self, limit: u32, backoff: Duration) -> Self {
        self.http = self.http.with_retry(limit, backoff);
        self
    }

    /// Search titles; an empty title browses everything
    ///
    /// `title` is expected to be sanitized already.
    pub async fn search_movies(&self, title: &str, page: u32) -> Result<MoviesPage> {
        let endpoint = if title.is_empty() {
            format!("/movies/search?page={}", page)
        } else {
            format!(
                "/movies/search?Title={}&page={}",
                urlencoding::encode(title),
                page
            )
        };

        let body = self.http.get_text(&endpoint, &MESSAGES).await?;
        let parsed = parse_page(&body)?;
        debug!(
            "Search '{}' page {}: {} of {} results",
            title,
            parsed.page,
            parsed.data.len(),
            parsed.total
        );
        Ok(parsed)
    }

    /// Browse all titles (no title filter)
    pub async fn get_all_movies(&self, page: u32) -> Result<MoviesPage> {
        self.search_movies("", page).await
    }
}

/// Parse and validate a search envelope
fn parse_page(body: &str) -> Result<MoviesPage> {
    let page: MoviesPage = serde_json::from_str(body).map_err(|e| {
        debug!("Search response rejected: {}", e);
        Error::data_format("Invalid API response format")
    })?;

    if let Some(bad) = page.data.iter().find(|m| !m.imdb_id.starts_with("tt")) {
        debug!("Search response rejected: bad id {:?}", bad.imdb_id);
        return Err(Error::data_format("Invalid API response format"));
    }

    Ok(page)
}
