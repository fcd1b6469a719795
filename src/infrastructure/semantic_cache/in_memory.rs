//! In-memory similarity cache implementation

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::embedding::Embedding;
use crate::domain::semantic_cache::{
    CacheHit, CachedEntry, SemanticCacheConfig, SemanticCacheStats, SimilarityCache,
    ensure_dimensions, nearest,
};

/// In-memory similarity cache using linear search
///
/// Suitable for development and small-scale deployments.
/// Entries are lost on restart; use the Redis backend to persist them.
#[derive(Debug)]
pub struct InMemorySimilarityCache {
    entries: RwLock<HashMap<String, CachedEntry>>,
    config: SemanticCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl InMemorySimilarityCache {
    pub fn new(config: SemanticCacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Drop expired entries, then the oldest one if the cache is still full
    fn evict_if_needed(&self, entries: &mut HashMap<String, CachedEntry>) {
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let expired = before - entries.len();
        if expired > 0 {
            self.evictions.fetch_add(expired as u64, Ordering::Relaxed);
        }

        if entries.len() < self.config.max_entries.max(1) {
            return;
        }

        if let Some(oldest_id) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.created_at())
            .map(|(id, _)| id.clone())
        {
            entries.remove(&oldest_id);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl SimilarityCache for InMemorySimilarityCache {
    async fn check(
        &self,
        _prompt: &str,
        embedding: &Embedding,
    ) -> Result<Option<CacheHit>, DomainError> {
        ensure_dimensions(self.config.dimensions, embedding.vector())?;

        let mut entries = self.entries.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let found = nearest(
            entries.values(),
            embedding.vector(),
            self.config.distance_threshold,
        )
        .map(|(entry, distance)| (entry.id().to_string(), distance));

        match found {
            Some((id, distance)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                let entry = entries
                    .get_mut(&id)
                    .ok_or_else(|| DomainError::internal("Matched entry disappeared"))?;
                entry.increment_hits();
                Ok(Some(entry.to_hit(distance)))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn store(
        &self,
        prompt: &str,
        response: &str,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        ensure_dimensions(self.config.dimensions, embedding.vector())?;

        let mut entries = self.entries.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        self.evict_if_needed(&mut entries);

        let entry = CachedEntry::new(
            Uuid::new_v4().to_string(),
            embedding.vector().to_vec(),
            prompt,
            response,
            self.config.ttl(),
        );
        entries.insert(entry.id().to_string(), entry);

        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);

        Ok(())
    }

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(SemanticCacheStats {
            total_entries: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        })
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn distance_threshold(&self) -> f32 {
        self.config.distance_threshold
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unit(dims: usize, hot: usize) -> Embedding {
        let mut v = vec![0.0; dims];
        v[hot] = 1.0;
        Embedding::new(v)
    }

    fn cache(dims: usize) -> InMemorySimilarityCache {
        InMemorySimilarityCache::new(SemanticCacheConfig::new().with_dimensions(dims))
    }

    #[tokio::test]
    async fn test_store_and_check() {
        let cache = cache(4);
        cache.store("hello", "world", &unit(4, 0)).await.unwrap();

        let hit = cache.check("hello", &unit(4, 0)).await.unwrap().unwrap();

        assert_eq!(hit.prompt, "hello");
        assert_eq!(hit.response, "world");
        assert!(hit.distance < 1e-6);
    }

    #[tokio::test]
    async fn test_check_miss_beyond_threshold() {
        let cache = cache(4);
        cache.store("hello", "world", &unit(4, 0)).await.unwrap();

        assert!(cache.check("other", &unit(4, 1)).await.unwrap().is_none());

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_check_returns_nearest() {
        let cache = InMemorySimilarityCache::new(
            SemanticCacheConfig::new()
                .with_dimensions(2)
                .with_distance_threshold(0.5),
        );
        cache
            .store("a", "close", &Embedding::new(vec![1.0, 0.2]))
            .await
            .unwrap();
        cache
            .store("b", "closest", &Embedding::new(vec![1.0, 0.01]))
            .await
            .unwrap();

        let hit = cache
            .check("q", &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(hit.response, "closest");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_keeps_entries() {
        let cache = cache(768);
        cache.store("kept", "value", &unit(768, 3)).await.unwrap();

        let err = cache
            .store("bad", "value", &Embedding::new(vec![0.1; 384]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::DimensionMismatch {
                expected: 768,
                actual: 384
            }
        ));
        assert_eq!(cache.stats().await.unwrap().total_entries, 1);
        assert!(cache.check("kept", &unit(768, 3)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_check_rejects_wrong_dimensions() {
        let cache = cache(768);

        let err = cache
            .check("q", &Embedding::new(vec![0.1; 384]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_eviction() {
        let cache = InMemorySimilarityCache::new(
            SemanticCacheConfig::new()
                .with_dimensions(4)
                .with_max_entries(2),
        );

        for i in 0..3 {
            cache
                .store(&format!("p{}", i), "r", &unit(4, i))
                .await
                .unwrap();
        }

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.evictions, 1);
    }

    #[tokio::test]
    async fn test_expired_entries_not_returned() {
        let cache = InMemorySimilarityCache::new(
            SemanticCacheConfig::new()
                .with_dimensions(4)
                .with_ttl(Duration::from_secs(0)),
        );
        cache.store("hello", "world", &unit(4, 0)).await.unwrap();

        assert!(cache.check("hello", &unit(4, 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let cache = cache(4);
        cache.store("hello", "world", &unit(4, 0)).await.unwrap();
        cache.check("hello", &unit(4, 0)).await.unwrap();
        cache.check("hello", &unit(4, 0)).await.unwrap();
        cache.check("other", &unit(4, 1)).await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);

        cache.clear().await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_backend_info() {
        let cache = cache(768);

        assert_eq!(cache.backend_name(), "in_memory");
        assert_eq!(cache.dimensions(), 768);
        assert!((cache.distance_threshold() - 0.1).abs() < f32::EPSILON);
    }
}
