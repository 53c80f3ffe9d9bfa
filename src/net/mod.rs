//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured address (":4000", "host:port")
//!     → listener.rs (normalize, resolve, bind)
//!     → tls.rs (optional certificate loading)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional and served by a separate listener
//! - Both listeners share one router state

pub mod listener;
pub mod tls;
