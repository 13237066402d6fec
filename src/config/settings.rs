//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so a missing file is not an error: the bot can
//! run from environment variables alone. `DATABASE_URL` in the environment
//! always wins over the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "POCKET_LEDGER_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `SeaORM` connection string
    pub database_url: String,
    /// Currency suffix shown after amounts (e.g., "руб.")
    pub currency: String,
    /// How many operations `/operations` lists at most
    pub recent_operations_limit: usize,
    /// Register commands in this guild only (faster during development)
    pub dev_guild_id: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: super::database::DEFAULT_DATABASE_URL.to_string(),
            currency: "руб.".to_string(),
            recent_operations_limit: 10,
            dev_guild_id: None,
        }
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    let config = parse_config(&contents)?;
    if config.recent_operations_limit == 0 {
        return Err(Error::Config {
            message: "recent_operations_limit must be greater than zero".to_string(),
        });
    }
    Ok(config)
}

/// Loads the application configuration the way the binary does:
/// the file named by [`CONFIG_PATH_ENV`] (or `config.toml`) if present,
/// defaults otherwise, then `DATABASE_URL` from the environment on top.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        info!("Loading configuration from {path}");
        load_config(&path)?
    } else {
        info!("No configuration file at {path}, using defaults");
        AppConfig::default()
    };

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        debug!("DATABASE_URL overrides configured database");
        config.database_url = database_url;
    }

    Ok(config)
}
