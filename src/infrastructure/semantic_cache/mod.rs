//! Similarity cache implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::SimilarityCacheFactory;
pub use in_memory::InMemorySimilarityCache;
pub use redis::RedisSimilarityCache;
