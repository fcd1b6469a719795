//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Storage backend for the similarity cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    InMemory,
    Redis,
}

/// Configuration for semantic caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Whether semantic caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub backend: CacheBackend,

    /// Cache name, used as the key prefix by persistent backends
    #[serde(default = "default_name")]
    pub name: String,

    /// Redis connection URL (redis backend only)
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Maximum cosine distance for a hit (0.0 to 2.0)
    /// Lower values require more similar prompts
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,

    /// Embedding dimensionality accepted by the cache
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Maximum number of entries to store
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Time-to-live for cached entries in seconds; entries never expire when unset
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

fn default_name() -> String {
    "llmcache".to_string()
}

fn default_distance_threshold() -> f32 {
    0.1
}

fn default_dimensions() -> usize {
    768
}

fn default_max_entries() -> usize {
    10000
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: CacheBackend::default(),
            name: default_name(),
            redis_url: None,
            distance_threshold: default_distance_threshold(),
            dimensions: default_dimensions(),
            max_entries: default_max_entries(),
            ttl_secs: None,
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get TTL as Duration
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_backend(mut self, backend: CacheBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Set the distance threshold
    pub fn with_distance_threshold(mut self, threshold: f32) -> Self {
        self.distance_threshold = threshold.clamp(0.0, 2.0);
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = Some(ttl.as_secs());
        self
    }
}
