//! Content addressing.
//!
//! Maps an inbound request to the store key holding its pre-rendered body.

pub mod keys;

pub use keys::{ContentKeys, DEFAULT_PROJECT, INDEX_KEY_PARAM};
