//! Store configuration loading
//!
//! Both settings (store URL, access key) are mandatory. Each is resolved
//! independently in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//!
//! There is no compiled default; a setting missing from all three sources is a
//! configuration error naming every place it could have been provided.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable holding the store endpoint URL
pub const STORE_URL_ENV: &str = "NICHEBOARD_STORE_URL";

/// Environment variable holding the store access key
pub const ACCESS_KEY_ENV: &str = "NICHEBOARD_ACCESS_KEY";

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub store_url: Option<String>,
    pub access_key: Option<String>,
}

/// Which persistence backend a store URL selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Embedded SQLite (`sqlite:` URLs)
    Sqlite,
    /// Hosted PostgREST-compatible store (`http://`, `https://`)
    Rest,
}

/// Resolved store settings
#[derive(Clone)]
pub struct StoreConfig {
    pub store_url: String,
    pub access_key: String,
}

impl StoreConfig {
    pub fn new(store_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            access_key: access_key.into(),
        }
    }

    /// Backend selected by the URL scheme
    pub fn backend(&self) -> Result<StoreBackend> {
        let url = self.store_url.trim();
        if url.starts_with("sqlite:") {
            Ok(StoreBackend::Sqlite)
        } else if url.starts_with("http://") || url.starts_with("https://") {
            Ok(StoreBackend::Rest)
        } else {
            Err(Error::Config(format!(
                "Unsupported store URL '{}': expected sqlite:, http:// or https://",
                self.store_url
            )))
        }
    }
}

// The access key never appears in logs
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("store_url", &self.store_url)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Resolves `StoreConfig` from CLI arguments, environment and config file
#[derive(Debug, Clone, Default)]
pub struct StoreConfigResolver {
    cli_store_url: Option<String>,
    cli_access_key: Option<String>,
    config_file: Option<PathBuf>,
}

impl StoreConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values given on the command line
    pub fn with_cli(mut self, store_url: Option<String>, access_key: Option<String>) -> Self {
        self.cli_store_url = store_url;
        self.cli_access_key = access_key;
        self
    }

    /// Use this TOML file instead of searching the default locations
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn resolve(&self) -> Result<StoreConfig> {
        let file = self.load_toml();

        let store_url = non_empty(self.cli_store_url.clone())
            .or_else(|| env_value(STORE_URL_ENV))
            .or_else(|| non_empty(file.store_url.clone()))
            .ok_or_else(|| missing_setting("store URL", "--store-url", STORE_URL_ENV, "store_url"))?;

        let access_key = non_empty(self.cli_access_key.clone())
            .or_else(|| env_value(ACCESS_KEY_ENV))
            .or_else(|| non_empty(file.access_key.clone()))
            .ok_or_else(|| {
                missing_setting("access key", "--access-key", ACCESS_KEY_ENV, "access_key")
            })?;

        let config = StoreConfig {
            store_url,
            access_key,
        };
        config.backend()?;

        debug!(?config, "Store configuration resolved");
        Ok(config)
    }

    fn load_toml(&self) -> TomlConfig {
        let path = match &self.config_file {
            Some(path) => Some(path.clone()),
            None => default_config_file(),
        };

        let Some(path) = path else {
            return TomlConfig::default();
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                if self.config_file.is_some() {
                    warn!("Could not read config file {}: {}", path.display(), e);
                }
                return TomlConfig::default();
            }
        };

        match toml::from_str::<TomlConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        }
    }
}

/// First existing config file: `~/.config/nicheboard/config.toml`, then
/// `/etc/nicheboard/config.toml` on Unix
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("nicheboard").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/nicheboard/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

fn env_value(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

/// Trimmed value, or `None` when blank
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing_setting(what: &str, flag: &str, env: &str, key: &str) -> Error {
    Error::Config(format!(
        "The store {what} is required but was not provided.\n\
         Set it with the {flag} flag, the {env} environment variable (a .env file works too), \
         or the `{key}` key in ~/.config/nicheboard/config.toml."
    ))
}
