//! Store key resolution.
//!
//! Every key lives under `<project>:index:`. Requests read
//! `current-content` unless they name another render with `index_key`.

use url::form_urlencoded;

/// Query parameter selecting an alternate render.
pub const INDEX_KEY_PARAM: &str = "index_key";

/// Project used until one is configured.
pub const DEFAULT_PROJECT: &str = "site";

const CURRENT_CONTENT: &str = "current-content";

/// Project namespace and the default content key derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentKeys {
    project: String,
    base: String,
}

impl ContentKeys {
    pub fn new(project: impl Into<String>) -> Self {
        let project = project.into();
        let base = index_key(&project, CURRENT_CONTENT);
        Self { project, base }
    }

    /// Replace the project and its base key together.
    pub fn set_project(&mut self, project: impl Into<String>) {
        *self = Self::new(project);
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// `<project>:index:current-content`
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Key for a request with the given raw query string.
    ///
    /// The first well-formed `index_key` occurrence decides; an empty value
    /// counts as absent. Pairs containing `;` or a broken `%` escape are
    /// skipped.
    pub fn resolve(&self, query: Option<&str>) -> String {
        let requested = query.and_then(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty() && !pair.contains(';') && has_valid_escapes(pair))
                .flat_map(|pair| form_urlencoded::parse(pair.as_bytes()))
                .find(|(name, _)| name == INDEX_KEY_PARAM)
                .map(|(_, value)| value)
        });

        match requested {
            Some(name) if !name.is_empty() => index_key(&self.project, &name),
            _ => self.base.clone(),
        }
    }
}

/// Every `%` is followed by two hex digits.
fn has_valid_escapes(raw: &str) -> bool {
    raw.split('%')
        .skip(1)
        .all(|rest| rest.len() >= 2 && rest.as_bytes()[..2].iter().all(u8::is_ascii_hexdigit))
}

impl Default for ContentKeys {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT)
    }
}

fn index_key(project: &str, name: &str) -> String {
    format!("{}:index:{}", project, name)
}
