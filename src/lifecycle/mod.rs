//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Connect store → Project + backends → Bind listeners → Serve
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listeners
//! - No reload and no graceful shutdown; the process exits to stop

pub mod startup;

pub use startup::{boot, build_state, run, StartupError};
