//! Application state

use std::sync::Arc;

use beam_core::models::ModelRegistry;
use chrono::{DateTime, Utc};

use crate::config::ServerConfig;

/// Shared application state.
///
/// Models are read-only after startup, so requests share them without locks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub models: Arc<ModelRegistry>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, models: ModelRegistry) -> Self {
        Self {
            config: Arc::new(config),
            models: Arc::new(models),
            started_at: Utc::now(),
        }
    }
}
