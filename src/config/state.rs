// Application state module
// Everything a request handler needs, built once at startup

use crate::resolver::{DirOpener, HtmlFallback};

use super::types::Config;

/// Shared application state
pub struct AppState {
    pub config: Config,
    /// Composed opener: root-bound file access with the `.html` fallback rule.
    pub opener: HtmlFallback<DirOpener>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let opener = HtmlFallback::new(DirOpener::new(config.static_files.root.clone()));
        Self { config, opener }
    }
}
