//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::EngineConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Availability engine configuration, resolved once at startup
    pub engine: EngineConfig,
}

impl AppState {
    /// Create a new application state with the given repository and the
    /// default engine configuration.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            engine: EngineConfig::default(),
        }
    }

    /// Create a state with an explicit engine configuration.
    pub fn with_engine(repository: Arc<dyn FullRepository>, engine: EngineConfig) -> Self {
        Self { repository, engine }
    }
}
