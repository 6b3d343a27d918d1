//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the API base must be an http(s) URL
//! and the request timeout must be positive.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// File-level configuration.
///
/// # Example
///
/// ```toml
/// [api]
/// base_url = "https://api.getpostman.com"
/// api_key_env = "POSTMAN_API_KEY"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Remote API settings
    pub api: Option<ApiConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api) = &self.api {
            api.validate()?;
        }
        Ok(())
    }
}

/// Remote API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// API base URL, without trailing slash
    pub base_url: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue("api.base_url is empty".into()));
            }
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api.base_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        if let Some(env) = &self.api_key_env {
            if env.trim().is_empty() {
                return Err(ConfigError::InvalidValue("api.api_key_env is empty".into()));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses_to_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_file_parses() {
        let config: FileConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8080"
            api_key_env = "MY_KEY"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        let api = config.api.as_ref().unwrap();
        assert_eq!(api.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(api.api_key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(api.timeout_secs, Some(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_fields_rejected() {
        let res: Result<FileConfig, _> = toml::from_str("[api]\nbogus = 1\n");
        assert!(res.is_err());
    }

    #[test]
    fn non_http_base_rejected() {
        let config = FileConfig {
            api: Some(ApiConfig {
                base_url: Some("ftp://example.com".into()),
                ..Default::default()
            }),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = FileConfig {
            api: Some(ApiConfig {
                timeout_secs: Some(0),
                ..Default::default()
            }),
        };
        assert!(config.validate().is_err());
    }
}
