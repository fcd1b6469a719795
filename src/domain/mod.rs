//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod history;
pub mod llm;
pub mod semantic_cache;

pub use embedding::{Embedder, Embedding, cosine_distance, cosine_similarity};
pub use error::DomainError;
pub use history::{QueryHistory, QueryOutcome, QueryRecord};
pub use llm::{
    ApiStatus, CompletionRequest, GenerationError, GenerationErrorKind, Generator, RetryPolicy,
    StatusReport, check_status,
};
pub use semantic_cache::{
    CacheBackend, CacheHit, CachedEntry, SemanticCacheConfig, SemanticCacheStats, SimilarityCache,
};
