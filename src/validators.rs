//! Input sanitizing and validation
//!
//! Pure helpers applied to user input before it reaches a gateway.

use chrono::Datelike;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

/// Maximum length of a sanitized search query (in characters)
pub const MAX_QUERY_LEN: usize = 200;

/// Earliest year accepted anywhere in the app
pub const MIN_YEAR: i32 = 1900;

static IMDB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tt[0-9]{7,}$").expect("static pattern"));

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Trim, drop angle brackets and cap the length
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_QUERY_LEN)
        .collect()
}

/// External id format: `tt` followed by at least 7 digits
pub fn is_valid_imdb_id(id: &str) -> bool {
    IMDB_ID.is_match(id)
}

/// Years from 1900 up to five years ahead (announced releases)
pub fn is_valid_year(year: i32) -> bool {
    (MIN_YEAR..=current_year() + 5).contains(&year)
}

pub fn is_valid_page(page: i64) -> bool {
    page > 0
}

pub fn is_valid_search_query(query: &str) -> bool {
    sanitize_input(query).chars().count() <= MAX_QUERY_LEN
}

/// Parse JSON, falling back to `fallback` when the input is missing or corrupt
pub fn safe_json_parse<T: DeserializeOwned>(json: Option<&str>, fallback: T) -> T {
    match json {
        Some(s) if !s.is_empty() => serde_json::from_str(s).unwrap_or(fallback),
        _ => fallback,
    }
}

pub fn is_non_empty_string(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}
