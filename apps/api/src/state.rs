use std::sync::Arc;

use crate::config::Config;
use crate::synthesis::orchestrator::Synthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the injected model client. Tests build it around a stub `VisionModel`.
    pub synthesizer: Arc<Synthesizer>,
    pub config: Config,
}
