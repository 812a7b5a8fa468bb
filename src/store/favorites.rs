//! Favorites ledger
//!
//! A persisted list of favorited titles, newest first, unique by id.
//! The list is read once from storage when the ledger is created and
//! written back after every mutation. A mutation that cannot be written
//! leaves the in-memory list as it was.

use std::collections::HashSet;
use tracing::{debug, warn};

use super::filters::compare_titles;
use crate::error::{Error, Result};
use crate::models::{FavoriteMovie, FavoriteSortKey, Movie, SortOrder};
use crate::storage::{Storage, FAVORITES_KEY};
use crate::validators::safe_json_parse;

pub struct Favorites {
    favorites: Vec<FavoriteMovie>,
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for Favorites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Favorites")
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}

impl Favorites {
    /// Rehydrate from `storage`; missing or corrupt data yields an empty list
    pub fn load(storage: impl Storage + 'static) -> Self {
        let raw = storage.get(FAVORITES_KEY);
        let stored: Vec<FavoriteMovie> = safe_json_parse(raw.as_deref(), Vec::new());
        if stored.is_empty() && raw.as_deref().is_some_and(|s| s.trim() != "[]") {
            warn!("Stored favorites are unreadable, starting with an empty list");
        }

        // Enforce uniqueness on data written by someone else
        let mut seen = HashSet::new();
        let favorites: Vec<FavoriteMovie> = stored
            .into_iter()
            .filter(|f| seen.insert(f.movie.imdb_id.clone()))
            .collect();

        debug!("Loaded {} favorites", favorites.len());
        Self {
            favorites,
            storage: Box::new(storage),
        }
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.favorites)
            .map_err(|e| Error::data_format(e.to_string()))?;
        self.storage.set(FAVORITES_KEY, &json)
    }

    /// Persist the current list, restoring `previous` if the write fails
    fn commit(&mut self, previous: Vec<FavoriteMovie>) -> Result<()> {
        if let Err(e) = self.persist() {
            warn!("Failed to save favorites, keeping the previous list: {}", e);
            self.favorites = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.favorites.len()
    }

    pub fn has_favorites(&self) -> bool {
        !self.favorites.is_empty()
    }

    /// All favorites, newest first
    pub fn all(&self) -> &[FavoriteMovie] {
        &self.favorites
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteMovie> {
        self.favorites.iter()
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.favorites
            .iter()
            .map(|f| f.movie.imdb_id.as_str())
            .collect()
    }

    pub fn is_favorite(&self, imdb_id: &str) -> bool {
        self.favorites.iter().any(|f| f.movie.imdb_id == imdb_id)
    }

    pub fn get(&self, imdb_id: &str) -> Option<&FavoriteMovie> {
        self.favorites.iter().find(|f| f.movie.imdb_id == imdb_id)
    }

    /// Add at the front; no-op if the id is already present
    ///
    /// Returns whether the title was added.
    pub fn add(&mut self, movie: &Movie) -> Result<bool> {
        if self.is_favorite(&movie.imdb_id) {
            return Ok(false);
        }

        let favorite = FavoriteMovie {
            movie: movie.clone(),
            added_at: chrono::Utc::now().timestamp_millis(),
        };
        let previous = self.favorites.clone();
        self.favorites.insert(0, favorite);
        self.commit(previous)?;
        debug!("Added favorite {}", movie.imdb_id);
        Ok(true)
    }

    /// Returns whether the title was present
    pub fn remove(&mut self, imdb_id: &str) -> Result<bool> {
        let previous = self.favorites.clone();
        self.favorites.retain(|f| f.movie.imdb_id != imdb_id);
        let removed = self.favorites.len() != previous.len();
        self.commit(previous)?;
        if removed {
            debug!("Removed favorite {}", imdb_id);
        }
        Ok(removed)
    }

    /// Add if absent, remove if present; returns the new membership
    pub fn toggle(&mut self, movie: &Movie) -> Result<bool> {
        if self.is_favorite(&movie.imdb_id) {
            self.remove(&movie.imdb_id)?;
            Ok(false)
        } else {
            self.add(movie)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        let previous = std::mem::take(&mut self.favorites);
        self.commit(previous)
    }

    pub fn by_year(&self, year: i32) -> Vec<&FavoriteMovie> {
        self.favorites
            .iter()
            .filter(|f| f.movie.year == year)
            .collect()
    }

    /// Sorted copy (stable for equal keys)
    pub fn sorted(&self, key: FavoriteSortKey, order: SortOrder) -> Vec<FavoriteMovie> {
        let mut sorted = self.favorites.clone();
        sort_favorites(&mut sorted, key, order);
        sorted
    }
}

/// Stable in-place sort of any favorites selection
pub fn sort_favorites(favorites: &mut [FavoriteMovie], key: FavoriteSortKey, order: SortOrder) {
    favorites.sort_by(|a, b| {
        let ordering = match key {
            FavoriteSortKey::Title => compare_titles(&a.movie.title, &b.movie.title),
            FavoriteSortKey::Year => a.movie.year.cmp(&b.movie.year),
            FavoriteSortKey::AddedAt => a.added_at.cmp(&b.added_at),
        };
        order.apply(ordering)
    });
}
