// Shared application state: immutable bindings plus the error page
// registry, read by every request handler.

use std::path::PathBuf;

use super::types::Config;
use crate::handler::error_pages::ErrorPages;

/// One root directory bound to a normalized URL prefix.
///
/// Invariant: `prefix` starts and ends with `/`. Constructed once at
/// startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeBinding {
    pub root: PathBuf,
    pub prefix: String,
}

impl ServeBinding {
    pub fn new(root: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            root: root.into(),
            prefix: normalize_prefix(prefix),
        }
    }
}

/// Normalize a URL prefix to start and end with `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    let mut normalized = String::from(prefix);
    if !normalized.starts_with('/') {
        normalized.insert(0, '/');
    }
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Application state shared across connections.
pub struct AppState {
    pub config: Config,
    pub bindings: Vec<ServeBinding>,
    pub error_pages: ErrorPages,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let bindings = config
            .sites
            .iter()
            .map(|site| ServeBinding::new(&site.dir, &site.prefix))
            .collect();

        Self {
            config: config.clone(),
            bindings,
            error_pages: ErrorPages::new(),
        }
    }
}
