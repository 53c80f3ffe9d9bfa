//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (anchored prefix test)
//!     → Return: matched BackendRule or no-match (serve from store)
//!
//! Rule Compilation (at startup):
//!     "prefix:host" strings
//!     → backend.rs (split, parse upstream, bind proxy)
//!     → Append in configuration order
//!     → Frozen for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same path always matches same rule
//! - First match wins (ordered by registration)

pub mod backend;
pub mod matcher;
pub mod router;

pub use backend::{BackendRule, BackendSpec};
pub use matcher::PathPattern;
pub use router::BackendTable;
