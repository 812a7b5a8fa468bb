//! Search orchestration
//!
//! One search = one page from the title-search API, then a detail lookup
//! for every result in parallel so each title can carry its poster URL.
//! Detail failures only cost that title its image; a search failure
//! clears the page and leaves a message in [`MoviesStore::error`].

use tracing::{debug, info, warn};

use super::LoadingGuard;
use crate::api::{ImdbClient, MoviesClient};
use crate::models::{Movie, MovieDetail};
use crate::validators::sanitize_input;

/// Page size assumed until the API reports one
pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug)]
pub struct MoviesStore {
    movies_client: MoviesClient,
    imdb_client: ImdbClient,

    movies: Vec<Movie>,
    current_page: u32,
    total_pages: u32,
    total_results: u32,
    per_page: u32,
    search_query: String,
    loading: bool,
    error: Option<String>,
    error_status: Option<u16>,

    /// Incremented per fetch; tags log lines and lets callers spot stale data
    generation: u64,
}

impl MoviesStore {
    pub fn new(movies_client: MoviesClient, imdb_client: ImdbClient) -> Self {
        Self {
            movies_client,
            imdb_client,
            movies: Vec::new(),
            current_page: 1,
            total_pages: 0,
            total_results: 0,
            per_page: DEFAULT_PER_PAGE,
            search_query: String::new(),
            loading: false,
            error: None,
            error_status: None,
            generation: 0,
        }
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Sanitized query of the last successful search
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// HTTP status behind [`error`](Self::error), when there was a response
    pub fn error_status(&self) -> Option<u16> {
        self.error_status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_movies(&self) -> bool {
        !self.movies.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Fetch one page for `query` and enrich it with poster URLs
    ///
    /// An empty (or all-markup) query browses every title. Never fails:
    /// errors end up in [`error`](Self::error) with the page cleared.
    pub async fn fetch_movies(&mut self, query: &str, page: u32) {
        let _loading = LoadingGuard::new(&mut self.loading);
        self.error = None;
        self.error_status = None;
        self.generation += 1;
        let generation = self.generation;

        let sanitized = sanitize_input(query);
        debug!(generation, "Fetching '{}' page {}", sanitized, page);

        let response = if sanitized.is_empty() {
            self.movies_client.get_all_movies(page).await
        } else {
            self.movies_client.search_movies(&sanitized, page).await
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(generation, "Search for '{}' failed: {}", sanitized, e);
                self.error = Some(e.to_string());
                self.error_status = e.status();
                self.movies.clear();
                self.total_pages = 0;
                self.total_results = 0;
                return;
            }
        };

        let ids: Vec<String> = response.data.iter().map(|m| m.imdb_id.clone()).collect();
        let details = self.imdb_client.multiple_movie_details(&ids).await;

        self.movies = merge_images(response.data, details);
        self.current_page = response.page;
        self.total_pages = response.total_pages;
        self.total_results = response.total;
        self.per_page = response.per_page;
        self.search_query = sanitized;

        info!(
            generation,
            "Search '{}' page {}/{}: {} titles, {} with posters",
            self.search_query,
            self.current_page,
            self.total_pages,
            self.movies.len(),
            self.movies.iter().filter(|m| m.image_url.is_some()).count()
        );
    }

    /// Fresh search starting at page 1
    pub async fn search_movies_by_title(&mut self, query: &str) {
        self.current_page = 1;
        self.fetch_movies(query, 1).await;
    }

    /// Re-run the current query on `page`; returns false (and does nothing)
    /// when `page` is outside `1..=total_pages`
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages {
            return false;
        }
        let query = self.search_query.clone();
        self.fetch_movies(&query, page).await;
        true
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.go_to_page(self.current_page + 1).await
    }

    pub async fn previous_page(&mut self) -> bool {
        if !self.has_previous_page() {
            return false;
        }
        self.go_to_page(self.current_page - 1).await
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_status = None;
    }

    pub fn reset(&mut self) {
        self.movies.clear();
        self.current_page = 1;
        self.total_pages = 0;
        self.total_results = 0;
        self.search_query.clear();
        self.loading = false;
        self.error = None;
        self.error_status = None;
    }
}

/// Attach each detail's primary image to the search result in the same slot
fn merge_images(movies: Vec<Movie>, details: Vec<Option<MovieDetail>>) -> Vec<Movie> {
    movies
        .into_iter()
        .zip(details.into_iter().chain(std::iter::repeat(None)))
        .map(|(mut movie, detail)| {
            movie.image_url = detail
                .as_ref()
                .and_then(MovieDetail::image_url)
                .map(str::to_string);
            movie
        })
        .collect()
}
