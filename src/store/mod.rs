//! Content store subsystem.
//!
//! # Data Flow
//! ```text
//! Resolved content key
//!     → ContentStore::get (network I/O, per request)
//!     → Ok(bytes)  → 200 text/html
//!     → Err(_)     → 500, empty body
//! ```
//!
//! # Design Decisions
//! - One shared client, created and pinged at startup
//! - The client is safe for concurrent use; no locking here
//! - Values are opaque bytes, never parsed

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Errors returned by a content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No value stored under the key.
    #[error("key not found: {key}")]
    Missing { key: String },

    /// The store rejected or failed the command.
    #[error("store error: {0}")]
    Backend(#[from] ::redis::RedisError),

    /// The configured store address cannot be turned into a connection URL.
    #[error("invalid store address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
}

/// Read access to pre-rendered content.
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Fetch the value stored at `key`.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;
}
