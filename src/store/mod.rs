//! Session state: search results, detail cache, filters, favorites
//!
//! - `movies`: search orchestration and pagination
//! - `details`: per-id detail cache
//! - `filters`: year range + sort engine
//! - `favorites`: persisted favorites ledger

pub mod details;
pub mod favorites;
pub mod filters;
pub mod movies;

pub use details::DetailCache;
pub use favorites::Favorites;
pub use filters::Filters;
pub use movies::MoviesStore;

/// Holds a loading flag at `true` until dropped
///
/// Dropping happens on every exit path, including early returns and a
/// cancelled future, so the flag cannot stay stuck.
pub(crate) struct LoadingGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> LoadingGuard<'a> {
    pub(crate) fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_guard_resets_on_drop() {
        let mut loading = false;
        {
            let guard = LoadingGuard::new(&mut loading);
            assert!(*guard.flag);
        }
        assert!(!loading);
    }
}
