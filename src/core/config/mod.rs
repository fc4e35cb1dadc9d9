//! core::config
//!
//! Server profile store: loading and lookup.
//!
//! # Locations
//!
//! Searched in order, first hit wins:
//! 1. The file named by `--config`
//! 2. `$NGSI_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/ngsi/config.toml`
//! 4. `~/.ngsi/config.toml`
//!
//! A file named by `--config` must exist. For the other locations a missing
//! file is not an error and yields an empty store.
//!
//! # Example
//!
//! ```
//! use ngsiwork::core::config::Config;
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     [servers.keyrock]
//!     server_type = "keyrock"
//!     server_host = "http://localhost:3000"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.aliases(), vec!["keyrock"]);
//! assert!(config.server("orion").is_none());
//! ```

pub mod schema;

pub use schema::{ProfileFile, ServerEntry};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from profile store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// The loaded profile store.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed profiles.
    pub file: ProfileFile,
    /// Path the profiles were loaded from, if any.
    path: Option<PathBuf>,
}

impl Config {
    /// Load the profile store.
    ///
    /// `explicit` is the value of `--config`, which bypasses the search.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file is missing, or if a located
    /// file cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::locate(),
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let file = Self::read_profile_file(&path)?;
        file.validate()?;

        Ok(Config {
            file,
            path: Some(path),
        })
    }

    /// Parse a profile store from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        let file: ProfileFile = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        file.validate()?;
        Ok(Config { file, path: None })
    }

    /// Find the first existing file in the search order.
    fn locate() -> Option<PathBuf> {
        // 1. $NGSI_CONFIG
        if let Ok(path) = std::env::var("NGSI_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/ngsi/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("ngsi/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.ngsi/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".ngsi/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    fn read_profile_file(path: &Path) -> Result<ProfileFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Look up a profile by alias.
    pub fn server(&self, alias: &str) -> Option<&ServerEntry> {
        self.file.servers.get(alias)
    }

    /// All aliases, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        self.file.servers.keys().map(String::as_str).collect()
    }

    /// Path of the loaded file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
