//! Connection configuration loading.
//!
//! Values come from, in increasing precedence: built-in defaults, an
//! optional TOML file, and `SECURECHECK_DB_*` environment variables.

use std::path::Path;

use securecheck_database_models::ConnectionConfig;

use crate::DbError;

/// Environment variable overriding [`ConnectionConfig::host`].
pub const ENV_HOST: &str = "SECURECHECK_DB_HOST";
/// Environment variable overriding [`ConnectionConfig::user`].
pub const ENV_USER: &str = "SECURECHECK_DB_USER";
/// Environment variable overriding [`ConnectionConfig::password`].
pub const ENV_PASSWORD: &str = "SECURECHECK_DB_PASSWORD";
/// Environment variable overriding [`ConnectionConfig::database`].
pub const ENV_DATABASE: &str = "SECURECHECK_DB_NAME";
/// Environment variable overriding [`ConnectionConfig::port`].
pub const ENV_PORT: &str = "SECURECHECK_DB_PORT";

/// Parses a connection config from TOML text. Missing keys keep their
/// defaults.
///
/// # Errors
///
/// Returns [`DbError::Config`] if the text is not valid TOML or a value has
/// the wrong type.
pub fn parse_config(text: &str) -> Result<ConnectionConfig, DbError> {
    toml::from_str(text).map_err(|e| DbError::Config {
        message: format!("Invalid connection config: {e}"),
    })
}

/// Loads the connection config from an optional TOML file and applies
/// environment overrides.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be read or parsed, or an
/// environment override is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ConnectionConfig, DbError> {
    let config = match path {
        Some(path) => {
            log::debug!("Reading connection config from {}", path.display());
            parse_config(&std::fs::read_to_string(path)?)?
        }
        None => ConnectionConfig::default(),
    };

    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Applies overrides looked up by environment variable name.
///
/// # Errors
///
/// Returns [`DbError::Config`] if the port override is not a valid port.
pub fn apply_overrides(
    mut config: ConnectionConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConnectionConfig, DbError> {
    if let Some(host) = lookup(ENV_HOST) {
        config.host = host;
    }
    if let Some(user) = lookup(ENV_USER) {
        config.user = user;
    }
    if let Some(password) = lookup(ENV_PASSWORD) {
        config.password = password;
    }
    if let Some(database) = lookup(ENV_DATABASE) {
        config.database = database;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.port = port.trim().parse().map_err(|e| DbError::Config {
            message: format!("Invalid {ENV_PORT} '{port}': {e}"),
        })?;
    }

    Ok(config)
}
