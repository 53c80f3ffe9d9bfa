//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, listeners)
//!     → dispatch.rs (backend match or store lookup)
//!     → proxy.rs (forward to upstream, relay response)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod proxy;
pub mod server;
pub mod state;

pub use proxy::ReverseProxy;
pub use server::HttpServer;
pub use state::RouterState;
