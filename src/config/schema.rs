//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::content::DEFAULT_PROJECT;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Namespace for every store key.
    pub project: String,

    /// Plain HTTP listen address (e.g., ":4000").
    pub address: String,

    /// Optional HTTPS listener.
    pub tls: Option<TlsConfig>,

    /// Content store connection.
    pub store: StoreConfig,

    /// Backend rules as `prefix:host`, in match order.
    pub backends: Vec<String>,

    /// Logging settings.
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            address: ":4000".to_string(),
            tls: None,
            store: StoreConfig::default(),
            backends: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

/// HTTPS listener configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Listen address (e.g., ":4443").
    pub address: String,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Redis connection parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `host:port` of the redis server.
    pub address: String,

    /// Empty means no AUTH.
    pub password: String,

    /// Logical database index.
    pub db: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            address: "localhost:6379".to_string(),
            password: String::new(),
            db: 0,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,

    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "lightning=info,tower_http=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
