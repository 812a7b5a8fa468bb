//! Configuration management for moviedex
//!
//! Handles config file loading/saving and endpoint selection.
//! Config is stored at ~/.config/moviedex/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// Title-search API
pub const DEFAULT_MOVIES_API: &str = "https://jsonmock.hackerrank.com/api";

/// Detail-by-id API
pub const DEFAULT_IMDB_API: &str = "https://api.imdbapi.dev";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY_LIMIT: u32 = 2;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the title-search API
    pub movies_api_url: Option<String>,
    /// Base URL of the detail API
    pub imdb_api_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Retries on transient statuses
    pub retry_limit: Option<u32>,
    /// Where the favorites list lives
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/moviedex/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moviedex").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file; missing or invalid files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::try_load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config: {}", e);
            Self::default()
        })
    }

    /// Load config from a file the user named explicitly
    ///
    /// # Errors
    /// `Error::Config` when the file cannot be read or is not valid config.
    pub fn try_load_from(path: &Path) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid config at {}: {}", path.display(), e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Search API base URL with fallback chain:
    /// 1. Environment variable MOVIEDEX_MOVIES_API
    /// 2. Config file
    /// 3. Built-in default
    pub fn movies_api_url(&self) -> String {
        std::env::var("MOVIEDEX_MOVIES_API")
            .ok()
            .or_else(|| self.movies_api_url.clone())
            .unwrap_or_else(|| DEFAULT_MOVIES_API.to_string())
    }

    /// Detail API base URL (MOVIEDEX_IMDB_API, config, default)
    pub fn imdb_api_url(&self) -> String {
        std::env::var("MOVIEDEX_IMDB_API")
            .ok()
            .or_else(|| self.imdb_api_url.clone())
            .unwrap_or_else(|| DEFAULT_IMDB_API.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit.unwrap_or(DEFAULT_RETRY_LIMIT)
    }

    /// Data directory (MOVIEDEX_DATA_DIR, config, ~/.local/share/moviedex)
    pub fn data_dir(&self) -> Option<PathBuf> {
        std::env::var_os("MOVIEDEX_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| self.data_dir.clone())
            .or_else(|| dirs::data_dir().map(|p| p.join("moviedex")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.movies_api_url.is_none());
        assert!(config.data_dir.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry_limit(), 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            movies_api_url: Some("http://localhost:1234".into()),
            timeout_secs: Some(3),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
        assert_eq!(Config::load_from(&dir.path().join("missing.toml")), Config::default());
    }

    #[test]
    fn test_explicit_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "retry_limit = -1").unwrap();

        let err = Config::try_load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Config error: invalid config at"));

        let missing = Config::try_load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, Error::Config(_)));

        std::fs::write(&path, "retry_limit = 0").unwrap();
        assert_eq!(Config::try_load_from(&path).unwrap().retry_limit(), 0);
    }
}
