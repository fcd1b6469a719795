//! Shared application state for request handlers

use std::sync::Arc;

use crate::domain::history::QueryHistory;
use crate::infrastructure::services::{DemoRunner, SemanticLlmCacheService};

#[derive(Clone)]
pub struct AppState {
    pub cache_service: Arc<SemanticLlmCacheService>,
    pub history: Arc<QueryHistory>,
    pub demo: Arc<DemoRunner>,
}

impl AppState {
    pub fn new(
        cache_service: Arc<SemanticLlmCacheService>,
        history: Arc<QueryHistory>,
        demo: Arc<DemoRunner>,
    ) -> Self {
        Self {
            cache_service,
            history,
            demo,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cache_backend", &self.cache_service.cache_backend())
            .field("history_max_records", &self.history.max_records())
            .finish()
    }
}
