//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first match wins:
//! 1. An explicit path (the `--config` flag)
//! 2. `$ENVFORGE_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/envforge/config.toml`
//! 4. `~/.envforge/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use envforge::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("API base: {}", config.base_url());
//! ```

pub mod schema;

pub use schema::{ApiConfig, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Default remote API base.
pub const DEFAULT_BASE_URL: &str = "https://api.getpostman.com";

/// Default environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "POSTMAN_API_KEY";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("API key not set; export {0}")]
    MissingApiKey(String),
}

/// Resolved configuration.
///
/// Accessors apply defaults for anything the file leaves out.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: FileConfig,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. An explicit path that does not exist is a read error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::find_default() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    fn find_default() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("ENVFORGE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("envforge/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        let path = dirs::home_dir()?.join(".envforge/config.toml");
        path.exists().then_some(path)
    }

    /// Path the configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn api(&self) -> Option<&ApiConfig> {
        self.file.api.as_ref()
    }

    /// API base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api()
            .and_then(|a| a.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Name of the environment variable holding the API key.
    pub fn api_key_env(&self) -> &str {
        self.api()
            .and_then(|a| a.api_key_env.as_deref())
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.api()
                .and_then(|a| a.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        let var = self.api_key_env();
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey(var.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key_env(), DEFAULT_API_KEY_ENV);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.path().is_none());
    }

    #[test]
    fn explicit_path_overrides() {
        let file = write_config(
            "[api]\nbase_url = \"http://localhost:9000/\"\ntimeout_secs = 3\n",
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url(), "http://localhost:9000");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.path(), Some(file.path()));
    }

    #[test]
    fn missing_explicit_path_is_read_error() {
        let res = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(res, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = write_config("[api\n");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn invalid_value_rejected_on_load() {
        let file = write_config("[api]\ntimeout_secs = 0\n");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn missing_api_key_names_variable() {
        let file = write_config("[api]\napi_key_env = \"ENVFORGE_TEST_UNSET_KEY_VAR\"\n");
        let config = Config::load_from(file.path()).unwrap();
        let err = config.api_key().unwrap_err();
        assert!(err.to_string().contains("ENVFORGE_TEST_UNSET_KEY_VAR"));
    }
}
