//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `IHUZA_DATA_DIR` - Directory holding the JSON collections (default: `.ihuza`)
//! - `IHUZA_ON_CORRUPT` - `reseed` or `fail` when a collection does not decode (default: `reseed`)
//! - `IHUZA_LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `IHUZA_PASSWORD` - Password for `register`, `login` and `users add` when `--password` is omitted
//! - `RUST_LOG` - Log filter (default: `ihuza_cli=info,ihuza_core=info`)

use std::path::PathBuf;

use ihuza_core::RecoveryPolicy;
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".ihuza";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of the file storage backend
    pub data_dir: PathBuf,
    /// What to do with a collection that fails to decode
    pub recovery: RecoveryPolicy,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unsupported value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unsupported value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("IHUZA_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let recovery = lookup("IHUZA_ON_CORRUPT")
            .map(|raw| raw.parse::<RecoveryPolicy>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("IHUZA_ON_CORRUPT".to_string(), e))?
            .unwrap_or_default();

        let log_format = match lookup("IHUZA_LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Text,
            Some(raw) => match raw.as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => {
                    return Err(ConfigError::InvalidEnvVar(
                        "IHUZA_LOG_FORMAT".to_string(),
                        format!("expected text or json, got {other}"),
                    ));
                }
            },
        };

        Ok(Self {
            data_dir,
            recovery,
            log_format,
        })
    }
}
