//! Application configuration.
//!
//! Settings come from `config.toml` (path overridable with `CONFIG_PATH`); a missing file
//! falls back to defaults. `BIND_ADDRESS` and `DATABASE_URL` in the environment take
//! precedence over the file.

/// Database configuration and connection management
pub mod database;

/// Seed catalog configuration from config.toml
pub mod seed;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub use seed::{DeliveryLocationSeed, SeedConfig, StoreSeed};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Rows to create on first start
    #[serde(default)]
    pub seed: SeedConfig,
}

/// HTTP server settings from the `[server]` table
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// How long a login session stays valid
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

const fn default_session_ttl_hours() -> i64 {
    12
}

/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    validate_server_config(&config.server)?;
    Ok(config)
}

fn validate_server_config(server: &ServerConfig) -> Result<()> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&server.session_ttl_hours) {
        return Err(Error::Config {
            message: format!(
                "server.session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}"
            ),
        });
    }
    Ok(())
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads the application configuration the way `main` needs it.
///
/// Reads `CONFIG_PATH` (default `config.toml`); if that file does not exist the defaults
/// are used. `BIND_ADDRESS` overrides the configured bind address.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        tracing::warn!("No configuration file at {path}, using defaults");
        AppConfig::default()
    };

    if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
        config.server.bind_address = bind_address;
    }

    validate_server_config(&config.server)?;
    Ok(config)
}
