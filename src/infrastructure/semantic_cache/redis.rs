//! Redis-backed similarity cache
//!
//! Entries are JSON documents under `{name}:entry:{id}`, indexed by the set
//! `{name}:entries`. Hit/miss/eviction counters live in the hash `{name}:stats`.
//! Lookups load every indexed entry and scan linearly.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::embedding::Embedding;
use crate::domain::semantic_cache::{
    CacheHit, CachedEntry, SemanticCacheConfig, SemanticCacheStats, SimilarityCache,
    ensure_dimensions, nearest,
};

#[derive(Clone)]
pub struct RedisSimilarityCache {
    connection: ConnectionManager,
    config: SemanticCacheConfig,
}

impl fmt::Debug for RedisSimilarityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSimilarityCache")
            .field("name", &self.config.name)
            .field("dimensions", &self.config.dimensions)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisSimilarityCache {
    /// Connect to Redis using `config.redis_url`
    pub async fn new(config: SemanticCacheConfig) -> Result<Self, DomainError> {
        let url = config.redis_url.clone().ok_or_else(|| {
            DomainError::configuration("Redis URL is required for the redis cache backend")
        })?;

        let client = Client::open(url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn entry_key(&self, id: &str) -> String {
        entry_key(&self.config.name, id)
    }

    fn index_key(&self) -> String {
        format!("{}:entries", self.config.name)
    }

    fn stats_key(&self) -> String {
        format!("{}:stats", self.config.name)
    }

    async fn bump(&self, field: &str) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: i64 = conn
            .hincr(self.stats_key(), field, 1)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to update stats: {}", e)))?;

        Ok(())
    }

    /// Load all indexed entries, pruning ids whose documents have expired
    async fn load_entries(&self) -> Result<Vec<CachedEntry>, DomainError> {
        let mut conn = self.connection.clone();

        let ids: Vec<String> = conn
            .smembers(self.index_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to read cache index: {}", e)))?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.entry_key(id)).collect();
        let documents: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to load cache entries: {}", e)))?;

        let mut entries = Vec::with_capacity(documents.len());
        let mut stale = Vec::new();

        for (id, document) in ids.into_iter().zip(documents) {
            match document.map(|doc| serde_json::from_str::<CachedEntry>(&doc)) {
                Some(Ok(entry)) => entries.push(entry),
                Some(Err(e)) => {
                    debug!(id = %id, "Skipping unreadable cache entry: {}", e);
                    stale.push(id);
                }
                None => stale.push(id),
            }
        }

        if !stale.is_empty() {
            let _: i64 = conn
                .srem(self.index_key(), &stale)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to prune cache index: {}", e)))?;
        }

        Ok(entries)
    }

    async fn evict_if_needed(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let size: usize = conn
            .scard(self.index_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to read cache size: {}", e)))?;

        if size < self.config.max_entries.max(1) {
            return Ok(());
        }

        let victim: Option<String> = conn
            .spop(self.index_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to evict entry: {}", e)))?;

        if let Some(id) = victim {
            let _: i64 = conn
                .del(self.entry_key(&id))
                .await
                .map_err(|e| DomainError::cache(format!("Failed to evict entry: {}", e)))?;
            self.bump("evictions").await?;
        }

        Ok(())
    }
}

/// Await a stats update, keeping `value` even when the update fails
async fn after_stats<T, F>(value: T, field: &str, update: F) -> T
where
    F: Future<Output = Result<(), DomainError>>,
{
    if let Err(e) = update.await {
        warn!(field, "Failed to update cache stats: {}", e);
    }

    value
}

fn entry_key(name: &str, id: &str) -> String {
    format!("{}:entry:{}", name, id)
}

#[async_trait]
impl SimilarityCache for RedisSimilarityCache {
    async fn check(
        &self,
        _prompt: &str,
        embedding: &Embedding,
    ) -> Result<Option<CacheHit>, DomainError> {
        ensure_dimensions(self.config.dimensions, embedding.vector())?;

        let entries = self.load_entries().await?;
        let hit = nearest(&entries, embedding.vector(), self.config.distance_threshold)
            .map(|(entry, distance)| entry.to_hit(distance));

        let field = if hit.is_some() { "hits" } else { "misses" };

        Ok(after_stats(hit, field, self.bump(field)).await)
    }

    async fn store(
        &self,
        prompt: &str,
        response: &str,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        ensure_dimensions(self.config.dimensions, embedding.vector())?;

        self.evict_if_needed().await?;

        let entry = CachedEntry::new(
            Uuid::new_v4().to_string(),
            embedding.vector().to_vec(),
            prompt,
            response,
            self.config.ttl(),
        );
        let document = serde_json::to_string(&entry)
            .map_err(|e| DomainError::internal(format!("Failed to serialize entry: {}", e)))?;
        let key = self.entry_key(entry.id());
        let mut conn = self.connection.clone();

        match self.config.ttl() {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(&key, document, ttl.as_secs().max(1))
                    .await
                    .map_err(|e| DomainError::cache(format!("Failed to store entry: {}", e)))?;
            }
            None => {
                let _: () = conn
                    .set(&key, document)
                    .await
                    .map_err(|e| DomainError::cache(format!("Failed to store entry: {}", e)))?;
            }
        }

        let _: i64 = conn
            .sadd(self.index_key(), entry.id())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to index entry: {}", e)))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let ids: Vec<String> = conn
            .smembers(self.index_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to read cache index: {}", e)))?;

        let mut keys: Vec<String> = ids.iter().map(|id| self.entry_key(id)).collect();
        keys.push(self.index_key());
        keys.push(self.stats_key());

        let _: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to clear cache: {}", e)))?;

        Ok(())
    }

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        let mut conn = self.connection.clone();

        let total_entries: usize = conn
            .scard(self.index_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to read cache size: {}", e)))?;

        let counters: HashMap<String, u64> = conn
            .hgetall(self.stats_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to read stats: {}", e)))?;

        let counter = |name: &str| counters.get(name).copied().unwrap_or(0);

        Ok(SemanticCacheStats {
            total_entries,
            hits: counter("hits"),
            misses: counter("misses"),
            evictions: counter("evictions"),
        })
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn distance_threshold(&self) -> f32 {
        self.config.distance_threshold
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
