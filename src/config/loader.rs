//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and backend rule parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// Backend entry without a `:` between prefix and host.
    #[error("bad backend format '{0}': expected prefix:host")]
    MissingSeparator(String),

    #[error("invalid backend host '{host}': {source}")]
    InvalidHost {
        host: String,
        source: axum::http::uri::InvalidUri,
    },

    #[error("backend host '{0}' has no authority")]
    MissingAuthority(String),

    #[error("invalid backend prefix '{prefix}': {source}")]
    Pattern { prefix: String, source: regex::Error },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
