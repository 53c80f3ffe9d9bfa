//! Path prefix matching.
//!
//! # Responsibilities
//! - Compile a configured prefix into an anchored regular expression
//! - Test request paths against it
//!
//! # Design Decisions
//! - The prefix is compiled as `^<prefix>`, so it only ever matches at the
//!   start of the path
//! - The prefix is not escaped: plain paths behave as literal prefixes, and
//!   existing deployments relying on regex syntax keep working
//! - Path matching is case-sensitive

use regex::Regex;

use crate::config::ConfigError;

/// A prefix test expressed as an anchored regular expression.
#[derive(Debug, Clone)]
pub struct PathPattern {
    prefix: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile `^<prefix>`.
    pub fn new(prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        let regex = Regex::new(&format!("^{}", prefix)).map_err(|source| ConfigError::Pattern {
            prefix: prefix.clone(),
            source,
        })?;
        Ok(Self { prefix, regex })
    }

    /// Returns true if `path` starts with this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The prefix as it was configured.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The compiled expression, including the leading anchor.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
