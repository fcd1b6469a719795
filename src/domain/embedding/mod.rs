//! Embedding domain models and traits

mod embedder;
mod vector;

pub use embedder::{ensure_not_empty, Embedder};
pub use vector::{cosine_distance, cosine_similarity, Embedding};

#[cfg(test)]
pub use embedder::mock::MockEmbedder;
