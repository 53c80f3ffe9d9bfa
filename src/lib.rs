//! Lightning: serve pre-rendered content from redis, with live escape hatches.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net (plain / TLS listener)
//!                       │
//!                       ▼
//!                     http::dispatch ──── path matches a backend rule? ───▶ http::proxy ──▶ Upstream
//!                       │ no
//!                       ▼
//!                     content::keys (current-content or index_key override)
//!                       │
//!                       ▼
//!                     store (redis GET) ──▶ 200 text/html | 500
//! ```

pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod store;

pub use config::schema::ServerConfig;
pub use http::{HttpServer, RouterState};
pub use store::{ContentStore, MemoryStore, RedisStore, StoreError};
