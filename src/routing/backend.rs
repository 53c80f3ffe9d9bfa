//! Backend rule definitions.
//!
//! # Responsibilities
//! - Parse `prefix:host` configuration strings
//! - Bind a compiled pattern to a reverse-proxy handle

use crate::config::ConfigError;
use crate::http::proxy::{ProxyClient, ReverseProxy, Upstream};
use crate::routing::matcher::PathPattern;

/// A parsed but not yet compiled `prefix:host` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSpec {
    pub prefix: String,
    pub host: String,
}

impl BackendSpec {
    /// Split at the first `:`. Everything after it is the host, so
    /// `host:port` targets are kept intact.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let (prefix, host) = spec
            .split_once(':')
            .ok_or_else(|| ConfigError::MissingSeparator(spec.to_string()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            host: host.to_string(),
        })
    }

    /// Parse the host as the authority (and optional base path) of an
    /// `http://` URL.
    pub fn upstream(&self) -> Result<Upstream, ConfigError> {
        Upstream::parse(&self.host)
    }
}

/// A single forwarding rule. Immutable once registered.
#[derive(Debug)]
pub struct BackendRule {
    pub pattern: PathPattern,
    pub host: String,
    pub proxy: ReverseProxy,
}

impl BackendRule {
    /// Compile a rule from its configuration string.
    pub fn from_spec(spec: &str, client: ProxyClient) -> Result<Self, ConfigError> {
        let spec = BackendSpec::parse(spec)?;
        let proxy = ReverseProxy::new(client, spec.upstream()?)?;
        let pattern = PathPattern::new(spec.prefix)?;

        Ok(Self {
            pattern,
            host: spec.host,
            proxy,
        })
    }

    /// Returns true if the request path falls under this rule.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::proxy::new_client;

    #[test]
    fn test_parse_splits_at_first_colon() {
        let spec = BackendSpec::parse("/assets:api.internal:8080").unwrap();
        assert_eq!(spec.prefix, "/assets");
        assert_eq!(spec.host, "api.internal:8080");
    }

    #[test]
    fn test_parse_without_separator() {
        let err = BackendSpec::parse("noColon").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSeparator(ref s) if s == "noColon"));
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let spec = BackendSpec::parse("/api:").unwrap();
        assert!(spec.upstream().is_err());
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let spec = BackendSpec::parse("/api:bad host").unwrap();
        assert!(matches!(
            spec.upstream(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }

    #[tokio::test]
    async fn test_rule_from_spec() {
        let rule = BackendRule::from_spec("/assets:api.internal:8080", new_client()).unwrap();
        assert_eq!(rule.host, "api.internal:8080");
        assert_eq!(rule.pattern.prefix(), "/assets");
        assert_eq!(rule.proxy.authority(), "api.internal:8080");
        assert!(rule.matches("/assets/logo.png"));
        assert!(!rule.matches("/index.html"));
    }

    #[tokio::test]
    async fn test_rule_with_base_path() {
        let rule = BackendRule::from_spec("/api:backend:9000/v2", new_client()).unwrap();
        assert_eq!(rule.proxy.authority(), "backend:9000");
        assert_eq!(rule.proxy.base_path(), "/v2");
    }
}
