//! CLI - Command Line Interface for moviedex
//!
//! Every action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search, newest first, 1990s only
//! moviedex search matrix --sort year-desc --year-from 1990 --year-to 1999
//!
//! # Details for one title
//! moviedex info tt0133093
//!
//! # Favorites
//! moviedex favorites toggle tt0133093
//! moviedex favorites list --sort added --order desc
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{FavoriteSortKey, Movie, SortOption, SortOrder};
use crate::validators::is_valid_imdb_id;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network or API error
    NetworkError = 3,
    /// Title not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// moviedex - search movies, see posters, keep favorites
#[derive(Parser, Debug)]
#[command(
    name = "moviedex",
    version,
    about = "Search movies and keep a local favorites list",
    after_help = "EXAMPLES:\n\
                  moviedex search matrix                  Search by title\n\
                  moviedex search --page 3                Browse all titles\n\
                  moviedex info tt0133093                 Title details\n\
                  moviedex favorites toggle tt0133093     Add/remove a favorite"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

/// Log levels for `--log-level`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search movies by title (omit the query to browse all)
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details for a movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Manage favorites
    #[command(visible_alias = "fav")]
    Favorites(FavoritesCmd),
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for movies by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title words); empty browses all titles
    pub query: Option<String>,

    /// Page to start from
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Number of consecutive pages to fetch
    #[arg(long, default_value = "1")]
    pub pages: u32,

    /// Sort order
    #[arg(long, short = 's', value_enum, default_value = "title-asc")]
    pub sort: SortArg,

    /// Minimum year
    #[arg(long)]
    pub year_from: Option<i32>,

    /// Maximum year
    #[arg(long)]
    pub year_to: Option<i32>,

    /// Maximum number of results to print
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

/// Sort options for search results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortArg {
    /// Title (A-Z)
    #[default]
    TitleAsc,
    /// Title (Z-A)
    TitleDesc,
    /// Year (oldest first)
    YearAsc,
    /// Year (newest first)
    YearDesc,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::TitleAsc => SortOption::TitleAsc,
            SortArg::TitleDesc => SortOption::TitleDesc,
            SortArg::YearAsc => SortOption::YearAsc,
            SortArg::YearDesc => SortOption::YearDesc,
        }
    }
}

// =============================================================================
// Info Command
// =============================================================================

/// Get detailed information about a movie
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// IMDb ID (e.g., tt0133093)
    #[arg(required = true)]
    pub imdb_id: String,
}

// =============================================================================
// Favorites Command
// =============================================================================

#[derive(Args, Debug)]
pub struct FavoritesCmd {
    #[command(subcommand)]
    pub action: FavoritesAction,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List favorites
    #[command(visible_alias = "ls")]
    List(FavoritesListCmd),

    /// Show one favorite
    Show(FavoriteIdCmd),

    /// Add a movie (title/year are looked up when omitted)
    Add(FavoriteEntryCmd),

    /// Remove a movie
    #[command(visible_alias = "rm")]
    Remove(FavoriteIdCmd),

    /// Add if absent, remove if present
    Toggle(FavoriteEntryCmd),

    /// Remove all favorites
    Clear,
}

#[derive(Args, Debug)]
pub struct FavoritesListCmd {
    /// Sort key
    #[arg(long, short = 's', value_enum, default_value = "added")]
    pub sort: FavoriteSortArg,

    /// Sort direction
    #[arg(long, short = 'o', value_enum, default_value = "desc")]
    pub order: OrderArg,

    /// Only favorites from this year
    #[arg(long, short = 'y')]
    pub year: Option<i32>,
}

#[derive(Args, Debug)]
pub struct FavoriteIdCmd {
    /// IMDb ID (e.g., tt0133093)
    #[arg(required = true)]
    pub imdb_id: String,
}

#[derive(Args, Debug)]
pub struct FavoriteEntryCmd {
    /// IMDb ID (e.g., tt0133093)
    #[arg(required = true)]
    pub imdb_id: String,

    /// Title (skips the detail lookup when given with --year)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Release year
    #[arg(long, short = 'y')]
    pub year: Option<i32>,
}

impl FavoriteEntryCmd {
    /// The entry as a movie, if enough was given on the command line
    pub fn to_movie(&self) -> Option<Movie> {
        match (&self.title, self.year) {
            (Some(title), Some(year)) => Some(Movie::new(title.clone(), year, self.imdb_id.clone())),
            _ => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteSortArg {
    Title,
    Year,
    /// Time added
    Added,
}

impl From<FavoriteSortArg> for FavoriteSortKey {
    fn from(arg: FavoriteSortArg) -> Self {
        match arg {
            FavoriteSortArg::Title => FavoriteSortKey::Title,
            FavoriteSortArg::Year => FavoriteSortKey::Year,
            FavoriteSortArg::Added => FavoriteSortKey::AddedAt,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl Default for StatusOk {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

/// One search result line
#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub movie: Movie,
    pub favorite: bool,
}

/// Search command response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub per_page: u32,
    pub sort: SortOption,
    pub year_range: (i32, i32),
    pub filters_active: bool,
    pub results: Vec<SearchHit>,
}

/// Favorite mutation response
#[derive(Debug, Serialize)]
pub struct FavoriteChange {
    pub imdb_id: String,
    pub favorite: bool,
    pub changed: bool,
    pub count: usize,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// IMDb ID Validation
// =============================================================================

/// Validate IMDb ID format (tt followed by 7+ digits)
pub fn validate_imdb_id(id: &str) -> Result<&str, &'static str> {
    if is_valid_imdb_id(id) {
        Ok(id)
    } else {
        Err("Invalid IMDb ID format (expected tt followed by 7+ digits)")
    }
}

// =============================================================================
// Tests
// =============================================================================
