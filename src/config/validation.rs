//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check listener settings are usable
//! - Check backend entries have the `prefix:host` shape
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Upstream host and pattern parsing happen at registration, where they
//!   are equally fatal

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listen address is empty")]
    EmptyAddress,

    #[error("tls address is empty")]
    EmptyTlsAddress,

    #[error("tls listener requires both a certificate and a key")]
    MissingTlsMaterial,

    #[error("backend '{0}' is not in prefix:host form")]
    MalformedBackend(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.address.trim().is_empty() {
        errors.push(ValidationError::EmptyAddress);
    }

    if let Some(tls) = &config.tls {
        if tls.address.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsAddress);
        }
        if tls.cert_path.is_empty() || tls.key_path.is_empty() {
            errors.push(ValidationError::MissingTlsMaterial);
        }
    }

    errors.extend(
        config
            .backends
            .iter()
            .filter(|spec| !spec.contains(':'))
            .map(|spec| ValidationError::MalformedBackend(spec.clone())),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
