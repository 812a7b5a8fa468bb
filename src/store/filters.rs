//! Filter and sort state for result lists
//!
//! Filtering keeps titles inside an inclusive year range; sorting is by
//! title or year in either direction. Both work on anything implementing
//! [`TitleRecord`], so search results and favorites share one engine.

use std::cmp::Ordering;

use crate::models::{SortOption, TitleRecord};
use crate::validators::{current_year, MIN_YEAR};

/// Latest year the range slider allows (next year, for announced releases)
pub fn max_year() -> i32 {
    current_year() + 1
}

/// Default `(MIN_YEAR, max_year())` bounds
pub fn default_year_range() -> (i32, i32) {
    (MIN_YEAR, max_year())
}

/// Title ordering that ignores case first, then puts lowercase before
/// uppercase, then falls back to code point order (a total order)
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    let cases = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();

    folded(a)
        .cmp(&folded(b))
        .then_with(|| cases(a).cmp(&cases(b)))
        .then_with(|| a.cmp(b))
}

/// Ascending/descending comparison for one sort option
pub fn compare_by<T: TitleRecord>(a: &T, b: &T, sort: SortOption) -> Ordering {
    let ordering = match sort {
        SortOption::TitleAsc | SortOption::TitleDesc => compare_titles(a.title(), b.title()),
        SortOption::YearAsc | SortOption::YearDesc => a.year().cmp(&b.year()),
    };
    sort.order().apply(ordering)
}

/// Current filter selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    sort: SortOption,
    year_range: (i32, i32),
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            sort: SortOption::default(),
            year_range: default_year_range(),
        }
    }
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn year_range(&self) -> (i32, i32) {
        self.year_range
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
    }

    /// Clamp each bound into `[MIN_YEAR, max_year()]`
    ///
    /// `min > max` is kept as given; such a range matches nothing.
    pub fn set_year_range(&mut self, min: i32, max: i32) {
        self.year_range = (min.max(MIN_YEAR), max.min(max_year()));
    }

    /// Back to default sort and full year range
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when either the range or the sort differs from the defaults
    pub fn has_active_filters(&self) -> bool {
        self.year_range != default_year_range() || self.sort != SortOption::default()
    }

    pub fn matches<T: TitleRecord>(&self, item: &T) -> bool {
        let (min, max) = self.year_range;
        min <= item.year() && item.year() <= max
    }

    /// Filtered, sorted copy of `items` (stable for equal keys)
    pub fn apply<T: TitleRecord + Clone>(&self, items: &[T]) -> Vec<T> {
        let mut filtered: Vec<T> = items.iter().filter(|m| self.matches(*m)).cloned().collect();
        filtered.sort_by(|a, b| compare_by(a, b, self.sort));
        filtered
    }
}

/// `(min, max)` year over `items`, or the default bounds when empty
pub fn year_range_from<T: TitleRecord>(items: &[T]) -> (i32, i32) {
    let years = items.iter().map(|m| m.year());
    match (years.clone().min(), years.max()) {
        (Some(min), Some(max)) => (min, max),
        _ => default_year_range(),
    }
}
