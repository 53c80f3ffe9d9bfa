//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the content store
//! - Apply the project and backend rules from configuration
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, ServerConfig};
use crate::http::{HttpServer, RouterState};
use crate::net::listener::{self, ListenerError};
use crate::net::tls::{TlsError, TlsListener};
use crate::store::{ContentStore, RedisStore, StoreError};

/// Anything that stops the server from starting or keeps it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store connection failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] TlsError),

    #[error("listener stopped: {0}")]
    Serve(std::io::Error),
}

/// Configure router state around an existing store.
///
/// Backend rules are registered in configuration order.
pub fn build_state(config: &ServerConfig, store: Arc<dyn ContentStore>) -> Result<RouterState, ConfigError> {
    let mut state = RouterState::new(store);
    state.set_project(config.project.as_str());
    for spec in &config.backends {
        state.add_backend(spec)?;
    }
    Ok(state)
}

/// Connect to redis, then configure the router around it.
pub async fn boot(config: &ServerConfig) -> Result<HttpServer, StartupError> {
    let store = RedisStore::connect(&config.store.address, &config.store.password, config.store.db).await?;
    let state = build_state(config, Arc::new(store))?;
    Ok(HttpServer::new(state))
}

/// Boot and serve until a listener fails.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let server = boot(&config).await?;
    let plain = listener::bind(&config.address).await?;

    tracing::info!(project = %config.project, "Lightning server booted");
    tracing::info!("Listening on {}", config.address);

    let secure = match &config.tls {
        Some(tls_config) => {
            let secure = TlsListener::prepare(tls_config).await?;
            tracing::info!("Listening on TLS {}", tls_config.address);
            Some(secure)
        }
        None => None,
    };

    match secure {
        Some(TlsListener { addr, rustls }) => {
            tokio::try_join!(server.serve(plain), server.serve_tls(addr, rustls)).map_err(StartupError::Serve)?;
        }
        None => server.serve(plain).await.map_err(StartupError::Serve)?,
    }

    Ok(())
}
