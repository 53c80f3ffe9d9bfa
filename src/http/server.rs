//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatch handler as fallback
//! - Wire up middleware (request tracing)
//! - Serve on any number of plain or TLS listeners
//!
//! # Design Decisions
//! - Every listener shares the same immutable `RouterState`
//! - Connection info is attached so the proxy can set `X-Forwarded-For`
//! - No graceful shutdown: listeners run until the process exits

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::http::dispatch::dispatch;
use crate::http::state::RouterState;

/// HTTP front end for the router.
#[derive(Debug, Clone)]
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Freeze `state` and build the service around it.
    pub fn new(state: RouterState) -> Self {
        Self {
            router: Self::build_router(Arc::new(state)),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: Arc<RouterState>) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// The service, for mounting on a custom listener or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP listener started");

        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await
    }

    /// Serve HTTPS on `addr` with the given certificate material.
    pub async fn serve_tls(&self, addr: SocketAddr, tls: RustlsConfig) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS listener started");

        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls).serve(app).await
    }
}
