//! Command-line flags.
//!
//! Flags override values from the optional `--config` file. Backends from
//! the command line are appended after those from the file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{LogFormat, ServerConfig, TlsConfig};
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "lightning")]
#[command(about = "Serve pre-rendered content from redis, proxying selected paths to live backends", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project to fetch from redis for
    #[arg(long)]
    pub project: Option<String>,

    /// Address to listen on
    #[arg(long)]
    pub address: Option<String>,

    /// Address to connect to redis
    #[arg(long)]
    pub redis: Option<String>,

    /// Redis password to use
    #[arg(long)]
    pub password: Option<String>,

    /// Redis db to use
    #[arg(long)]
    pub db: Option<u32>,

    /// TLS address to listen on
    #[arg(long)]
    pub tls_address: Option<String>,

    /// TLS private key (PEM)
    #[arg(long)]
    pub tls_key: Option<String>,

    /// TLS certificate (PEM)
    #[arg(long)]
    pub tls_cert: Option<String>,

    /// prefix:host to proxy to (repeatable)
    #[arg(long = "backend", value_name = "PREFIX:HOST")]
    pub backends: Vec<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Resolve the final configuration: file (or defaults), then flags.
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(project) = self.project {
            config.project = project;
        }
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(redis) = self.redis {
            config.store.address = redis;
        }
        if let Some(password) = self.password {
            config.store.password = password;
        }
        if let Some(db) = self.db {
            config.store.db = db;
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }

        match self.tls_address {
            Some(address) if address.is_empty() => config.tls = None,
            Some(address) => config.tls.get_or_insert_with(TlsConfig::default).address = address,
            None => {}
        }
        if let Some(tls) = config.tls.as_mut() {
            if let Some(cert) = self.tls_cert {
                tls.cert_path = cert;
            }
            if let Some(key) = self.tls_key {
                tls.key_path = key;
            }
        }

        config.backends.extend(self.backends);

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
