//! Data structures and types for moviedex
//!
//! Contains the shared models used across the application:
//! - **Search**: title-search results and the paged envelope they arrive in
//! - **Details**: per-title metadata from the detail API
//! - **Favorites**: persisted favorite entries
//! - **Sorting**: sort options shared by the filter engine and the ledger

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// =============================================================================
// Search Models
// =============================================================================

/// A single title from the search API, optionally enriched with a poster URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: i32, imdb_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year,
            imdb_id: imdb_id.into(),
            image_url: None,
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.year, self.imdb_id)
    }
}

/// Paged envelope returned by the search API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviesPage {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<Movie>,
}

// =============================================================================
// Detail Models
// =============================================================================

/// `year` arrives either as a number or as a string such as "1999" or "1999–2003"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

impl YearValue {
    /// Numeric year, taking the leading digits of a textual value
    pub fn as_year(&self) -> Option<i32> {
        match self {
            YearValue::Number(n) => i32::try_from(*n).ok(),
            YearValue::Text(s) => {
                let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse().ok()
            }
        }
    }
}

/// Genres arrive either as a list or as a comma-separated string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Genres {
    List(Vec<String>),
    Text(String),
}

impl Genres {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Genres::List(list) => list.clone(),
            Genres::Text(s) => s
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_professions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metacritic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

/// Country or language reference (`{code, name}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_subgenre: Option<bool>,
}

/// Detailed title information from the detail API
///
/// Almost every field is optional; only `id` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<YearValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Genres>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<Metacritic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writers: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_countries: Option<Vec<CodeName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_languages: Option<Vec<CodeName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<Interest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl MovieDetail {
    /// Best available title: primary, then plain, then original
    pub fn display_title(&self) -> Option<&str> {
        self.primary_title
            .as_deref()
            .or(self.title.as_deref())
            .or(self.original_title.as_deref())
    }

    /// Release year from `startYear`, falling back to `year`
    pub fn release_year(&self) -> Option<i32> {
        self.start_year
            .or_else(|| self.year.as_ref().and_then(YearValue::as_year))
    }

    pub fn image_url(&self) -> Option<&str> {
        self.primary_image.as_ref().map(|img| img.url.as_str())
    }

    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime_seconds.map(|s| s / 60)
    }

    /// Search-result view of this record, if it carries a title and a year
    pub fn to_movie(&self) -> Option<Movie> {
        let title = self.display_title()?;
        let year = self.release_year()?;
        Some(Movie {
            title: title.to_string(),
            year,
            imdb_id: self.id.clone(),
            image_url: self.image_url().map(str::to_string),
        })
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.display_title().unwrap_or(&self.id);
        match self.release_year() {
            Some(year) => write!(f, "{} ({})", title, year)?,
            None => write!(f, "{}", title)?,
        }
        if let Some(score) = self.rating.as_ref().and_then(|r| r.aggregate_rating) {
            write!(f, " - ⭐ {:.1}", score)?;
        }
        Ok(())
    }
}

// =============================================================================
// Favorites
// =============================================================================

/// A favorited title with the time it was added (ms since the Unix epoch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteMovie {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "addedAt")]
    pub added_at: i64,
}

impl fmt::Display for FavoriteMovie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.movie.fmt(f)
    }
}

/// Anything the filter engine can sort and filter
pub trait TitleRecord {
    fn title(&self) -> &str;
    fn year(&self) -> i32;
}

impl TitleRecord for Movie {
    fn title(&self) -> &str {
        &self.title
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl TitleRecord for FavoriteMovie {
    fn title(&self) -> &str {
        &self.movie.title
    }

    fn year(&self) -> i32 {
        self.movie.year
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort options exposed to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    TitleAsc,
    TitleDesc,
    YearAsc,
    YearDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::TitleAsc,
        SortOption::TitleDesc,
        SortOption::YearAsc,
        SortOption::YearDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::TitleAsc => "title-asc",
            SortOption::TitleDesc => "title-desc",
            SortOption::YearAsc => "year-asc",
            SortOption::YearDesc => "year-desc",
        }
    }

    /// Human label, e.g. for help text
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::TitleAsc => "Title (A-Z)",
            SortOption::TitleDesc => "Title (Z-A)",
            SortOption::YearAsc => "Year (Oldest First)",
            SortOption::YearDesc => "Year (Newest First)",
        }
    }

    pub fn order(&self) -> SortOrder {
        match self {
            SortOption::TitleAsc | SortOption::YearAsc => SortOrder::Asc,
            SortOption::TitleDesc | SortOption::YearDesc => SortOrder::Desc,
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|opt| opt.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Invalid sort option: {}", s)))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Apply this direction to an ascending comparison
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Keys the favorites ledger can sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FavoriteSortKey {
    Title,
    Year,
    AddedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_uses_upstream_field_names() {
        let json = r#"{"Title": "The Matrix", "Year": 1999, "imdbID": "tt0133093"}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.year, 1999);
        assert_eq!(movie.imdb_id, "tt0133093");
        assert!(movie.image_url.is_none());

        // Unset image URL stays out of the serialized form
        let out = serde_json::to_string(&movie).unwrap();
        assert!(!out.contains("imageUrl"));
    }

    #[test]
    fn test_favorite_flattens_movie() {
        let fav = FavoriteMovie {
            movie: Movie::new("Heat", 1995, "tt0113277"),
            added_at: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&fav).unwrap();
        assert_eq!(value["Title"], "Heat");
        assert_eq!(value["addedAt"], 1_700_000_000_000i64);

        let back: FavoriteMovie = serde_json::from_value(value).unwrap();
        assert_eq!(back, fav);
    }

    #[test]
    fn test_year_value_parsing() {
        assert_eq!(YearValue::Number(1999).as_year(), Some(1999));
        assert_eq!(YearValue::Text("2008–2013".into()).as_year(), Some(2008));
        assert_eq!(YearValue::Text("n/a".into()).as_year(), None);
    }

    #[test]
    fn test_genres_from_text() {
        let genres = Genres::Text("Action, Sci-Fi,".into());
        assert_eq!(genres.to_vec(), vec!["Action", "Sci-Fi"]);
    }

    #[test]
    fn test_detail_title_and_year_fallbacks() {
        let detail: MovieDetail = serde_json::from_str(
            r#"{"id": "tt0133093", "originalTitle": "The Matrix", "year": "1999"}"#,
        )
        .unwrap();
        assert_eq!(detail.display_title(), Some("The Matrix"));
        assert_eq!(detail.release_year(), Some(1999));
        assert!(detail.image_url().is_none());

        let movie = detail.to_movie().unwrap();
        assert_eq!(movie.imdb_id, "tt0133093");
        assert_eq!(movie.year, 1999);
    }

    #[test]
    fn test_sort_option_round_trip_names() {
        for opt in SortOption::ALL {
            assert_eq!(opt.as_str().parse::<SortOption>().unwrap(), opt);
        }
        assert!("newest".parse::<SortOption>().is_err());
        assert_eq!(SortOption::default(), SortOption::TitleAsc);
    }

    #[test]
    fn test_sort_order_apply() {
        use std::cmp::Ordering;
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
    }
}
