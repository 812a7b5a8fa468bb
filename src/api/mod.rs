//! API clients for external services
//!
//! - movies: paged title search
//! - imdb: per-title details (posters, ratings, credits)

pub mod client;
pub mod imdb;
pub mod movies;

pub use client::{HttpClient, StatusMessages};
pub use imdb::ImdbClient;
pub use movies::MoviesClient;
