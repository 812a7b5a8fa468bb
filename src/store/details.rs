//! Detail cache
//!
//! Keeps every detail record fetched during the session, keyed by id.
//! There is no eviction and no expiry; a forced refresh replaces an entry.

use std::collections::HashMap;
use tracing::debug;

use super::LoadingGuard;
use crate::api::ImdbClient;
use crate::error::Result;
use crate::models::MovieDetail;

#[derive(Debug)]
pub struct DetailCache {
    client: ImdbClient,
    entries: HashMap<String, MovieDetail>,
    current: Option<MovieDetail>,
    loading: bool,
    error: Option<String>,
}

impl DetailCache {
    pub fn new(client: ImdbClient) -> Self {
        Self {
            client,
            entries: HashMap::new(),
            current: None,
            loading: false,
            error: None,
        }
    }

    /// Cached record, without touching the network
    pub fn get(&self, imdb_id: &str) -> Option<&MovieDetail> {
        self.entries.get(imdb_id)
    }

    /// Cached record unless `force_refresh`, otherwise fetch and store it
    ///
    /// The fetched record becomes the current one. On failure the error
    /// message is kept in [`error`](Self::error) and the error is returned.
    pub async fn fetch_or_get(&mut self, imdb_id: &str, force_refresh: bool) -> Result<MovieDetail> {
        if !force_refresh {
            if let Some(detail) = self.entries.get(imdb_id) {
                debug!("Detail cache hit for {}", imdb_id);
                self.current = Some(detail.clone());
                return Ok(detail.clone());
            }
        }

        let _loading = LoadingGuard::new(&mut self.loading);
        self.error = None;

        match self.client.movie_details(imdb_id).await {
            Ok(detail) => {
                self.entries.insert(imdb_id.to_string(), detail.clone());
                self.current = Some(detail.clone());
                Ok(detail)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.current = None;
                Err(e)
            }
        }
    }

    pub fn current(&self) -> Option<&MovieDetail> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear_current(&mut self) {
        self.current = None;
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
