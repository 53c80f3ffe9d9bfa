//! Redis-backed content store.
//!
//! # Responsibilities
//! - Build the connection URL from address, password and db index
//! - Open a multiplexed, auto-reconnecting connection manager
//! - Verify liveness with a single PING before serving
//!
//! # Design Decisions
//! - One attempt at startup; failures are fatal to the caller
//! - Values are read as raw bytes so content is relayed byte-for-byte
//! - A nil reply is reported as `Missing`, like any other read error

use ::redis::aio::{ConnectionManager, ConnectionManagerConfig};
use ::redis::AsyncCommands;
use async_trait::async_trait;
use axum::body::Bytes;
use url::Url;

use super::{ContentStore, StoreError};

/// Shared handle to a Redis database.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    url: Url,
}

impl RedisStore {
    /// Connect to `address` (`host:port`, or `:port` for localhost),
    /// select `db`, authenticate when `password` is non-empty, and PING.
    pub async fn connect(address: &str, password: &str, db: u32) -> Result<Self, StoreError> {
        let url = connection_url(address, password, db)?;
        let client = ::redis::Client::open(url.as_str())?;
        let config = ConnectionManagerConfig::new().set_number_of_retries(0);
        let mut manager = client.get_connection_manager_with_config(config).await?;

        let pong: String = ::redis::cmd("PING").query_async(&mut manager).await?;
        tracing::info!(address = %address, db = db, reply = %pong, "Connected to redis");

        Ok(Self { manager, url })
    }

    /// The connection URL with any password redacted.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        if url.password().is_some() {
            let _ = url.set_password(Some("***"));
        }
        url.to_string()
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("url", &self.redacted_url())
            .finish()
    }
}

#[async_trait]
impl ContentStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;

        value.map(Bytes::from).ok_or_else(|| StoreError::Missing {
            key: key.to_string(),
        })
    }
}

/// Build `redis://[:password@]host:port/db`.
pub fn connection_url(address: &str, password: &str, db: u32) -> Result<Url, StoreError> {
    let invalid = |reason: String| StoreError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let host = if address.starts_with(':') {
        format!("127.0.0.1{}", address)
    } else {
        address.to_string()
    };

    let mut url = Url::parse(&format!("redis://{}/{}", host, db))
        .map_err(|e| invalid(e.to_string()))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|()| invalid("address cannot carry a password".to_string()))?;
    }

    Ok(url)
}
