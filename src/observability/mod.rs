//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (startup banners, proxy errors, lookups)
//!     → tower-http TraceLayer spans (one per request)
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```

pub mod logging;
