//! Generator trait definition

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{CompletionRequest, GenerationError};

/// Trait for text generation backends (OpenAI chat completions, ...)
///
/// Adapters classify their failures into a [`GenerationErrorKind`](super::GenerationErrorKind)
/// so callers never inspect error messages.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete a single prompt
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}
