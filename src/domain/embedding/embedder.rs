//! Embedder trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::Embedding;
use crate::domain::DomainError;

/// Trait for text embedders (OpenAI, local feature hashing, ...)
#[async_trait]
pub trait Embedder: Send + Sync + Debug {
    /// Embed a single text.
    ///
    /// Fails with [`DomainError::EmptyInput`] when `text` is empty.
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError>;

    /// Dimensionality of every vector this embedder produces
    fn dimensions(&self) -> usize;

    /// Model identifier, for logs and health output
    fn model(&self) -> &str;
}

/// Reject empty text before it reaches an embedding backend
pub fn ensure_not_empty(text: &str) -> Result<(), DomainError> {
    if text.is_empty() {
        return Err(DomainError::empty_input("Text for embedding cannot be empty"));
    }

    Ok(())
}
