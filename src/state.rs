use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::BlogStore;

/// Shared handles every handler and middleware receives.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn BlogStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn BlogStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
