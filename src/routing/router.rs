//! Backend rule lookup.
//!
//! # Responsibilities
//! - Store backend rules in registration order
//! - Look up the rule for a request path
//! - Return the matched rule or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after startup (shared without locks)
//! - O(n) scan, first match wins; no specificity ranking
//! - One pooled upstream client shared by every rule
//! - Rules see the decoded path; the raw URI is what gets forwarded

use percent_encoding::percent_decode_str;

use crate::config::ConfigError;
use crate::http::proxy::{new_client, ProxyClient};
use crate::routing::backend::BackendRule;

/// Ordered set of backend rules.
#[derive(Debug)]
pub struct BackendTable {
    rules: Vec<BackendRule>,
    client: ProxyClient,
}

impl BackendTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            client: new_client(),
        }
    }

    /// Register a `prefix:host` rule after all existing ones.
    pub fn add_backend(&mut self, spec: &str) -> Result<&BackendRule, ConfigError> {
        let rule = BackendRule::from_spec(spec, self.client.clone())?;

        tracing::info!(
            prefix = %rule.pattern.prefix(),
            host = %rule.host,
            "Proxying '{}' to '{}'",
            rule.pattern.prefix(),
            rule.host
        );

        self.rules.push(rule);
        Ok(&self.rules[self.rules.len() - 1])
    }

    /// First rule whose pattern matches `path`.
    pub fn match_path(&self, path: &str) -> Option<&BackendRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    /// First rule matching a raw, possibly percent-encoded, request path.
    pub fn match_encoded_path(&self, raw_path: &str) -> Option<&BackendRule> {
        let path = percent_decode_str(raw_path).decode_utf8_lossy();
        self.match_path(&path)
    }

    pub fn rules(&self) -> &[BackendRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for BackendTable {
    fn default() -> Self {
        Self::new()
    }
}
