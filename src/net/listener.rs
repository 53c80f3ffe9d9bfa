//! TCP listener binding.
//!
//! # Responsibilities
//! - Accept Go-style `:port` addresses as "all interfaces"
//! - Resolve host names to a socket address
//! - Bind the plain HTTP listener

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{lookup_host, TcpListener};

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Address did not resolve to anything.
    #[error("Failed to resolve '{0}'")]
    Resolve(String),
    /// Failed to bind to address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

/// Expand `:port` to `0.0.0.0:port`; other forms pass through.
pub fn normalize_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

/// Resolve an address to the first matching socket address.
pub async fn resolve(addr: &str) -> Result<SocketAddr, ListenerError> {
    let mut resolved = lookup_host(normalize_addr(addr))
        .await
        .map_err(|source| ListenerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    resolved
        .next()
        .ok_or_else(|| ListenerError::Resolve(addr.to_string()))
}

/// Bind a TCP listener on `addr`.
pub async fn bind(addr: &str) -> Result<TcpListener, ListenerError> {
    let socket_addr = resolve(addr).await?;
    let listener = TcpListener::bind(socket_addr)
        .await
        .map_err(|source| ListenerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    tracing::debug!(requested = %addr, bound = ?listener.local_addr().ok(), "Listener bound");
    Ok(listener)
}
