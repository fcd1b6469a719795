//! Similarity cache trait and types

use std::fmt::Debug;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::embedding::Embedding;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A stored prompt/response pair with the prompt's embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry {
    /// Unique identifier for this entry
    id: String,
    /// The prompt embedding used for similarity search
    embedding: Vec<f32>,
    /// The original prompt text
    prompt: String,
    /// The cached response
    response: String,
    /// When this entry was created
    created_at: u64,
    /// When this entry expires, if ever
    #[serde(default)]
    expires_at: Option<u64>,
    /// Number of cache hits
    #[serde(default)]
    hit_count: u32,
}

impl CachedEntry {
    /// Create a new cached entry
    pub fn new(
        id: impl Into<String>,
        embedding: Vec<f32>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Self {
        let now = now_secs();

        Self {
            id: id.into(),
            embedding,
            prompt: prompt.into(),
            response: response.into(),
            created_at: now,
            expires_at: ttl.map(|ttl| now + ttl.as_secs()),
            hit_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    /// Check if entry is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| now_secs() >= at)
    }

    pub fn increment_hits(&mut self) {
        self.hit_count += 1;
    }

    /// Build the hit returned to callers
    pub fn to_hit(&self, distance: f32) -> CacheHit {
        CacheHit {
            prompt: self.prompt.clone(),
            response: self.response.clone(),
            distance,
        }
    }
}

/// A successful cache lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHit {
    /// Prompt of the matched entry
    pub prompt: String,
    /// Stored response
    pub response: String,
    /// Cosine distance between the query and the matched prompt
    pub distance: f32,
}

/// Statistics for the similarity cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses
    pub misses: u64,
    /// Total entries evicted
    pub evictions: u64,
}

impl SemanticCacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}

/// Trait for vector-similarity caches
///
/// Implementations own the distance threshold and the dimensionality; every
/// stored vector must match [`dimensions`](SimilarityCache::dimensions).
#[async_trait]
pub trait SimilarityCache: Send + Sync + Debug {
    /// Find the nearest stored entry within the distance threshold
    async fn check(
        &self,
        prompt: &str,
        embedding: &Embedding,
    ) -> Result<Option<CacheHit>, DomainError>;

    /// Store a prompt/response pair.
    ///
    /// Fails with [`DomainError::DimensionMismatch`] when the embedding length
    /// differs from the configured dimensionality, leaving existing entries intact.
    async fn store(
        &self,
        prompt: &str,
        response: &str,
        embedding: &Embedding,
    ) -> Result<(), DomainError>;

    /// Remove every entry
    async fn clear(&self) -> Result<(), DomainError>;

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError>;

    /// Configured dimensionality
    fn dimensions(&self) -> usize;

    /// Maximum cosine distance counted as a hit
    fn distance_threshold(&self) -> f32;

    /// Backend identifier, for logs and health output
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_entry_creation() {
        let embedding = vec![0.1, 0.2, 0.3];
        let entry = CachedEntry::new("test-id", embedding.clone(), "hello world", "hi", None);

        assert_eq!(entry.id(), "test-id");
        assert_eq!(entry.embedding(), &embedding);
        assert_eq!(entry.prompt(), "hello world");
        assert_eq!(entry.response(), "hi");
        assert_eq!(entry.hit_count(), 0);
        assert!(entry.expires_at().is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_cached_entry_with_ttl() {
        let entry = CachedEntry::new(
            "test-id",
            vec![0.1],
            "query",
            "value",
            Some(Duration::from_secs(3600)),
        );

        assert_eq!(entry.expires_at(), Some(entry.created_at() + 3600));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_cached_entry_expired() {
        let mut entry = CachedEntry::new("test-id", vec![0.1], "query", "value", None);

        // Force expiration by setting expires_at to past
        entry.expires_at = Some(0);

        assert!(entry.is_expired());
    }

    #[test]
    fn test_cached_entry_increment_hits() {
        let mut entry = CachedEntry::new("test-id", vec![0.1], "query", "value", None);

        entry.increment_hits();
        entry.increment_hits();

        assert_eq!(entry.hit_count(), 2);
    }

    #[test]
    fn test_to_hit() {
        let entry = CachedEntry::new("id", vec![1.0], "prompt", "response", None);
        let hit = entry.to_hit(0.05);

        assert_eq!(hit.prompt, "prompt");
        assert_eq!(hit.response, "response");
        assert!((hit.distance - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn test_semantic_cache_stats() {
        let stats = SemanticCacheStats {
            total_entries: 100,
            hits: 80,
            misses: 20,
            evictions: 5,
        };

        assert!((stats.hit_rate() - 0.8).abs() < 0.01);
    }

    #[test]
    fn test_semantic_cache_stats_no_requests() {
        let stats = SemanticCacheStats::default();

        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_entry_round_trips_without_optional_fields() {
        let json = r#"{"id":"a","embedding":[1.0],"prompt":"p","response":"r","created_at":1}"#;
        let entry: CachedEntry = serde_json::from_str(json).unwrap();

        assert!(entry.expires_at().is_none());
        assert_eq!(entry.hit_count(), 0);
    }
}
