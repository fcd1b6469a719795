//! Semantic cache domain models and traits
//!
//! Provides vector-based caching that matches semantically similar prompts
//! rather than requiring exact key matches.

mod config;
mod repository;
mod search;

pub use config::{CacheBackend, SemanticCacheConfig};
pub use repository::{CacheHit, CachedEntry, SemanticCacheStats, SimilarityCache};
pub use search::{ensure_dimensions, nearest};
