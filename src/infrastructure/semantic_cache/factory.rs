//! Similarity cache factory for runtime backend selection

use std::sync::Arc;

use tracing::{info, warn};

use super::in_memory::InMemorySimilarityCache;
use super::redis::RedisSimilarityCache;
use crate::domain::DomainError;
use crate::domain::semantic_cache::{CacheBackend, SemanticCacheConfig, SimilarityCache};

/// Factory for creating similarity cache instances
#[derive(Debug, Default)]
pub struct SimilarityCacheFactory;

impl SimilarityCacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache for the configured backend, or `None` when caching is disabled
    pub async fn create(
        &self,
        config: &SemanticCacheConfig,
    ) -> Result<Option<Arc<dyn SimilarityCache>>, DomainError> {
        if !config.enabled {
            return Ok(None);
        }

        let cache: Arc<dyn SimilarityCache> = match config.backend {
            CacheBackend::InMemory => Arc::new(InMemorySimilarityCache::new(config.clone())),
            CacheBackend::Redis => Arc::new(RedisSimilarityCache::new(config.clone()).await?),
        };

        info!(
            backend = cache.backend_name(),
            name = %config.name,
            dimensions = config.dimensions,
            distance_threshold = config.distance_threshold,
            "Semantic cache initialized"
        );

        Ok(Some(cache))
    }

    /// Like [`create`](Self::create), but a backend that fails to initialise
    /// disables caching instead of failing startup
    pub async fn create_or_disable(
        &self,
        config: &SemanticCacheConfig,
    ) -> Option<Arc<dyn SimilarityCache>> {
        match self.create(config).await {
            Ok(cache) => cache,
            Err(e) => {
                warn!("Semantic cache unavailable, continuing without cache: {}", e);
                None
            }
        }
    }
}
