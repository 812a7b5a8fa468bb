//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend services.
//! Each handler takes CLI args, the loaded Config and Output, returns ExitCode.

use serde::Serialize;
use tracing::debug;

use crate::api::{ImdbClient, MoviesClient};
use crate::cli::{
    ExitCode, FavoriteChange, FavoriteEntryCmd, FavoriteIdCmd, FavoritesAction, FavoritesCmd,
    FavoritesListCmd, InfoCmd, Output, SearchCmd, SearchHit, SearchResponse, StatusOk,
    validate_imdb_id,
};
use crate::config::Config;
use crate::error::Error;
use crate::models::{FavoriteMovie, Movie, MovieDetail};
use crate::storage::FileStorage;
use crate::store::favorites::sort_favorites;
use crate::store::filters::default_year_range;
use crate::store::{DetailCache, Favorites, Filters, MoviesStore};
use crate::validators::{is_valid_page, is_valid_year};

/// Map a library error onto the CLI's exit codes
pub fn exit_code_for(error: &Error) -> ExitCode {
    match error {
        Error::Validation(_) => ExitCode::InvalidArgs,
        e if e.is_not_found() => ExitCode::NotFound,
        Error::Api { .. } | Error::DataFormat(_) => ExitCode::NetworkError,
        Error::Storage(_) | Error::Config(_) => ExitCode::Error,
    }
}

fn print_or_fail<T: Serialize>(output: &Output, data: T) -> ExitCode {
    if let Err(e) = output.print(data) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

fn open_favorites(config: &Config) -> Option<Favorites> {
    let dir = config.data_dir()?;
    debug!("Favorites directory: {}", dir.display());
    Some(Favorites::load(FileStorage::new(dir)))
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    // Over-long queries are truncated by sanitizing, not rejected
    let query = cmd.query.unwrap_or_default();
    if !is_valid_page(i64::from(cmd.page)) {
        return output.error("Page must be 1 or greater", ExitCode::InvalidArgs);
    }
    for year in [cmd.year_from, cmd.year_to].into_iter().flatten() {
        if !is_valid_year(year) {
            return output.error(format!("Year out of range: {}", year), ExitCode::InvalidArgs);
        }
    }

    let mut filters = Filters::new();
    filters.set_sort(cmd.sort.into());
    if cmd.year_from.is_some() || cmd.year_to.is_some() {
        let (min, max) = default_year_range();
        filters.set_year_range(cmd.year_from.unwrap_or(min), cmd.year_to.unwrap_or(max));
    }

    let mut store = MoviesStore::new(
        MoviesClient::from_config(config),
        ImdbClient::from_config(config),
    );

    if query.trim().is_empty() {
        output.info(format!("Browsing all titles (page {})", cmd.page));
    } else {
        output.info(format!("Searching for: {}", query));
    }

    store.fetch_movies(&query, cmd.page).await;
    if let Some(code) = search_failure(&store, output) {
        return code;
    }

    let mut movies: Vec<Movie> = store.movies().to_vec();
    for _ in 1..cmd.pages.max(1) {
        if !store.next_page().await {
            break;
        }
        if let Some(code) = search_failure(&store, output) {
            return code;
        }
        movies.extend_from_slice(store.movies());
    }

    let mut visible = filters.apply(&movies);
    if let Some(limit) = cmd.limit {
        visible.truncate(limit);
    }
    if visible.is_empty() {
        output.info("No movies match the current filters");
    } else {
        output.info(format!(
            "{} of {} results, sorted by {}",
            visible.len(),
            store.total_results(),
            filters.sort().label()
        ));
    }

    let favorites = open_favorites(config);
    let favorite_ids = favorites.as_ref().map(|f| f.ids()).unwrap_or_default();
    let results = visible
        .into_iter()
        .map(|movie| SearchHit {
            favorite: favorite_ids.contains(movie.imdb_id.as_str()),
            movie,
        })
        .collect();

    print_or_fail(
        output,
        SearchResponse {
            query: store.search_query().to_string(),
            page: store.current_page(),
            total_pages: store.total_pages(),
            total_results: store.total_results(),
            per_page: store.per_page(),
            sort: filters.sort(),
            year_range: filters.year_range(),
            filters_active: filters.has_active_filters(),
            results,
        },
    )
}

fn search_failure(store: &MoviesStore, output: &Output) -> Option<ExitCode> {
    let message = store.error()?;
    let code = match store.error_status() {
        Some(404) => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    };
    Some(output.error(format!("Search failed: {}", message), code))
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let mut cache = DetailCache::new(ImdbClient::from_config(config));

    output.info(format!("Getting info for: {}", cmd.imdb_id));

    match cache.fetch_or_get(&cmd.imdb_id, false).await {
        Ok(detail) => {
            output.info(&detail);
            print_or_fail(output, &detail)
        }
        Err(e) => output.error(format!("Info failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Favorites Command
// =============================================================================

pub async fn favorites_cmd(cmd: FavoritesCmd, config: &Config, output: &Output) -> ExitCode {
    let Some(mut favorites) = open_favorites(config) else {
        return output.error("No data directory available for favorites", ExitCode::Error);
    };

    match cmd.action {
        FavoritesAction::List(list) => favorites_list(list, &favorites, output),
        FavoritesAction::Show(show) => favorites_show(show, &favorites, output),
        FavoritesAction::Add(entry) => favorites_add(entry, &mut favorites, config, output).await,
        FavoritesAction::Remove(remove) => favorites_remove(remove, &mut favorites, output),
        FavoritesAction::Toggle(entry) => {
            favorites_toggle(entry, &mut favorites, config, output).await
        }
        FavoritesAction::Clear => {
            let removed = favorites.count();
            if let Err(e) = favorites.clear() {
                return output.error(format!("Failed to clear favorites: {}", e), ExitCode::Error);
            }
            output.info(format!("Removed {} favorites", removed));
            print_or_fail(output, StatusOk::default())
        }
    }
}

fn favorites_list(cmd: FavoritesListCmd, favorites: &Favorites, output: &Output) -> ExitCode {
    let mut list: Vec<FavoriteMovie> = match cmd.year {
        Some(year) => favorites.by_year(year).into_iter().cloned().collect(),
        None => favorites.all().to_vec(),
    };
    sort_favorites(&mut list, cmd.sort.into(), cmd.order.into());
    if list.is_empty() {
        output.info("No favorites yet");
    }
    print_or_fail(output, &list)
}

fn favorites_show(cmd: FavoriteIdCmd, favorites: &Favorites, output: &Output) -> ExitCode {
    match favorites.get(&cmd.imdb_id) {
        Some(favorite) => print_or_fail(output, favorite),
        None => output.error(
            format!("{} is not in favorites", cmd.imdb_id),
            ExitCode::NotFound,
        ),
    }
}

async fn favorites_add(
    cmd: FavoriteEntryCmd,
    favorites: &mut Favorites,
    config: &Config,
    output: &Output,
) -> ExitCode {
    if let Err(e) = validate_imdb_id(&cmd.imdb_id) {
        return output.error(e, ExitCode::InvalidArgs);
    }
    let movie = match resolve_movie(&cmd, config).await {
        Ok(movie) => movie,
        Err(e) => return output.error(format!("Lookup failed: {}", e), exit_code_for(&e)),
    };

    match favorites.add(&movie) {
        Ok(changed) => {
            if !changed {
                output.info(format!("{} is already a favorite", movie));
            }
            print_change(output, favorites, &movie.imdb_id, changed)
        }
        Err(e) => output.error(format!("Failed to save favorites: {}", e), exit_code_for(&e)),
    }
}

fn favorites_remove(cmd: FavoriteIdCmd, favorites: &mut Favorites, output: &Output) -> ExitCode {
    match favorites.remove(&cmd.imdb_id) {
        Ok(changed) => {
            if !changed {
                output.info(format!("{} is not in favorites", cmd.imdb_id));
            }
            print_change(output, favorites, &cmd.imdb_id, changed)
        }
        Err(e) => output.error(format!("Failed to save favorites: {}", e), exit_code_for(&e)),
    }
}

async fn favorites_toggle(
    cmd: FavoriteEntryCmd,
    favorites: &mut Favorites,
    config: &Config,
    output: &Output,
) -> ExitCode {
    if let Err(e) = validate_imdb_id(&cmd.imdb_id) {
        return output.error(e, ExitCode::InvalidArgs);
    }

    // Removing needs no lookup
    let movie = match favorites.get(&cmd.imdb_id) {
        Some(existing) => existing.movie.clone(),
        None => match resolve_movie(&cmd, config).await {
            Ok(movie) => movie,
            Err(e) => return output.error(format!("Lookup failed: {}", e), exit_code_for(&e)),
        },
    };

    match favorites.toggle(&movie) {
        Ok(now_favorite) => {
            output.info(if now_favorite {
                format!("Added {}", movie)
            } else {
                format!("Removed {}", movie)
            });
            print_change(output, favorites, &movie.imdb_id, true)
        }
        Err(e) => output.error(format!("Failed to save favorites: {}", e), exit_code_for(&e)),
    }
}

fn print_change(output: &Output, favorites: &Favorites, imdb_id: &str, changed: bool) -> ExitCode {
    print_or_fail(
        output,
        FavoriteChange {
            imdb_id: imdb_id.to_string(),
            favorite: favorites.is_favorite(imdb_id),
            changed,
            count: favorites.count(),
        },
    )
}

/// Title and year from the command line, or from the detail API
async fn resolve_movie(cmd: &FavoriteEntryCmd, config: &Config) -> crate::error::Result<Movie> {
    if let Some(movie) = cmd.to_movie() {
        return Ok(movie);
    }

    let detail: MovieDetail = ImdbClient::from_config(config)
        .movie_details(&cmd.imdb_id)
        .await?;
    let mut movie = detail
        .to_movie()
        .ok_or_else(|| Error::data_format("Movie details have no title or year"))?;
    if let Some(title) = &cmd.title {
        movie.title = title.clone();
    }
    if let Some(year) = cmd.year {
        movie.year = year;
    }
    Ok(movie)
}
