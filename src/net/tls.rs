//! HTTPS listener preparation.
//!
//! # Responsibilities
//! - Check the configured certificate and key paths before reading them
//! - Load PEM material into a rustls server config
//! - Resolve the TLS listen address (`:port` means all interfaces)
//!
//! # Design Decisions
//! - Every failure is fatal at startup and names the offending path
//! - Certificates are read once; no reload while serving

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::TlsConfig;
use crate::net::listener::{self, ListenerError};

/// Error type for TLS listener setup.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("certificate file not found: {}", .0.display())]
    MissingCertificate(PathBuf),

    #[error("private key file not found: {}", .0.display())]
    MissingKey(PathBuf),

    #[error("failed to load {} / {}: {source}", cert.display(), key.display())]
    Load {
        cert: PathBuf,
        key: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Address(#[from] ListenerError),
}

/// Resolved address and loaded certificate material for the HTTPS listener.
#[derive(Debug, Clone)]
pub struct TlsListener {
    pub addr: SocketAddr,
    pub rustls: RustlsConfig,
}

impl TlsListener {
    /// Load the certificate pair and resolve the listen address.
    pub async fn prepare(config: &TlsConfig) -> Result<Self, TlsError> {
        let rustls = load_certificates(Path::new(&config.cert_path), Path::new(&config.key_path)).await?;
        let addr = listener::resolve(&config.address).await?;

        tracing::debug!(address = %addr, cert = %config.cert_path, "TLS material loaded");
        Ok(Self { addr, rustls })
    }
}

async fn load_certificates(cert: &Path, key: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert.is_file() {
        return Err(TlsError::MissingCertificate(cert.to_path_buf()));
    }
    if !key.is_file() {
        return Err(TlsError::MissingKey(key.to_path_buf()));
    }

    RustlsConfig::from_pem_file(cert, key)
        .await
        .map_err(|source| TlsError::Load {
            cert: cert.to_path_buf(),
            key: key.to_path_buf(),
            source,
        })
}
