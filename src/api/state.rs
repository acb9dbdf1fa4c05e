use std::sync::Arc;

use crate::core::{AppConfig, Clock};
use crate::source::EventSource;

pub struct AppState {
    pub source: Arc<dyn EventSource>,
    // Consulted on every request so "today" is never cached
    pub clock: Arc<dyn Clock>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(source: Arc<dyn EventSource>, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        Self {
            source,
            clock,
            config,
        }
    }
}
