//! Tideline configuration.
//!
//! Loaded from `~/.tideline/config.toml`. A missing file means defaults.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::model::PageRequest;
use crate::storage::Storage;

/// Environment variable that overrides the configured database path.
pub const DATABASE_ENV: &str = "TIDELINE_DB";

/// Tideline configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Path to the `SQLite` database.
    pub database: Option<PathBuf>,

    /// Default researcher username for `research submit`.
    pub researcher: Option<String>,

    /// Default page size for `research search`.
    pub page_size: Option<u32>,
}

impl Config {
    /// Load config from `~/.tideline/config.toml`, or defaults if it doesn't exist.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.tideline/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tideline").join("config.toml"))
    }

    /// Database path: `TIDELINE_DB`, then `database`, then the storage default.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database_path_with(env::var_os(DATABASE_ENV))
    }

    fn database_path_with(&self, from_env: Option<OsString>) -> Option<PathBuf> {
        from_env
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.database.clone())
            .or_else(Storage::default_path)
    }

    /// Search page size, falling back to the built-in default.
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(PageRequest::DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert!(config.database.is_none());
        assert!(config.researcher.is_none());
        assert_eq!(config.page_size(), PageRequest::DEFAULT_SIZE);
    }

    #[test]
    fn parses_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "database = \"/tmp/t.sqlite\"\nresearcher = \"minji\"\npage-size = 25\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/t.sqlite")));
        assert_eq!(config.researcher.as_deref(), Some("minji"));
        assert_eq!(config.page_size(), 25);
    }

    #[test]
    fn env_database_overrides_config() {
        let config = Config {
            database: Some(PathBuf::from("/tmp/config.sqlite")),
            ..Config::default()
        };

        let path = config.database_path_with(Some("/tmp/env.sqlite".into()));
        assert_eq!(path, Some(PathBuf::from("/tmp/env.sqlite")));
    }

    #[test]
    fn empty_env_database_is_ignored() {
        let config = Config {
            database: Some(PathBuf::from("/tmp/config.sqlite")),
            ..Config::default()
        };

        let path = config.database_path_with(Some(OsString::new()));
        assert_eq!(path, Some(PathBuf::from("/tmp/config.sqlite")));
    }

    #[test]
    fn database_falls_back_to_storage_default() {
        let path = Config::default().database_path_with(None);
        assert_eq!(path, Storage::default_path());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default-identity = \"minji\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("invalid config"));
    }
}
