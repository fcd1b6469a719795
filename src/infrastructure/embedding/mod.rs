//! Embedder implementations

mod hashing;
mod openai;

pub use hashing::{DEFAULT_HASHING_DIMENSIONS, HashingEmbedder};
pub use openai::{DEFAULT_EMBEDDING_MODEL, OpenAiEmbedder, model_dimensions};

// Re-export HTTP client for use by embedders
pub use super::llm::{HttpClient, HttpClientTrait};
