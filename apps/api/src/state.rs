use std::sync::Arc;

use crate::config::Config;
use crate::profile::extract::ProfileExtractor;
use crate::publish::Publisher;
use crate::templates::Registry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; read-only for the life of the process.
    pub registry: Arc<Registry>,
    /// Pluggable profile extractor. Default: LlmProfileExtractor.
    pub extractor: Arc<dyn ProfileExtractor>,
    /// `None` when PUBLISH_MODE=disabled.
    pub publisher: Option<Arc<dyn Publisher>>,
    pub config: Config,
}
