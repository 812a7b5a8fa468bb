//! moviedex - movie search with poster enrichment and local favorites
//!
//! Searches a title API, decorates each result with the poster from a
//! second metadata API, filters and sorts the results, and keeps a
//! favorites list on disk.
//!
//! # Modules
//!
//! - `models` - Data structures for search results, details, favorites
//! - `api` - API clients (title search, details)
//! - `store` - Search orchestration, detail cache, filters, favorites
//! - `storage` - Key-value persistence behind the favorites ledger
//! - `validators` - Input sanitizing and format checks
//! - `config` - Config file and endpoint selection
//! - `error` - Error taxonomy
//! - `cli` / `commands` - Command line surface used by the `moviedex` binary

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;
pub mod validators;

// Re-export commonly used types
pub use models::{
    FavoriteMovie, FavoriteSortKey, Movie, MovieDetail, MoviesPage, SortOption, SortOrder,
    TitleRecord,
};

pub use api::{ImdbClient, MoviesClient};
pub use config::Config;
pub use error::{Error, Result};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{DetailCache, Favorites, Filters, MoviesStore};
