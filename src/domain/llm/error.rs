//! Classified generation failures

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of prompt characters quoted in placeholder responses
const PREVIEW_CHARS: usize = 50;

/// Failure class reported by a [`Generator`](super::Generator) adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    /// Billing quota exhausted; retrying cannot help
    QuotaExceeded,
    /// Credentials rejected; retrying cannot help
    AuthError,
    /// Transient throttling; eligible for backoff
    RateLimited,
    /// Anything else the backend (or the transport) reported
    Other,
}

impl GenerationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuotaExceeded => "quota_exceeded",
            Self::AuthError => "auth_error",
            Self::RateLimited => "rate_limited",
            Self::Other => "error",
        }
    }

    /// Only rate limiting is worth waiting out
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a generation backend, carrying a structured kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    kind: GenerationErrorKind,
    message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::QuotaExceeded, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::AuthError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::RateLimited, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Other, message)
    }

    pub fn kind(&self) -> GenerationErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Human-readable stand-in returned to callers instead of the error
    pub fn placeholder(&self, prompt: &str) -> String {
        let preview = prompt_preview(prompt);

        match self.kind {
            GenerationErrorKind::QuotaExceeded => format!(
                "[QUOTA_EXCEEDED] Unable to generate response for: '{}...' - Please check your OpenAI billing.",
                preview
            ),
            GenerationErrorKind::RateLimited => {
                format!("[RATE_LIMITED] Please try again later for: '{}...'", preview)
            }
            GenerationErrorKind::AuthError => {
                format!("[AUTH_ERROR] Invalid API key for: '{}...'", preview)
            }
            GenerationErrorKind::Other => format!(
                "[API_ERROR] Mock response for: '{}...' (OpenAI API not available)",
                preview
            ),
        }
    }
}

/// First characters of a prompt, cut on a char boundary
pub fn prompt_preview(prompt: &str) -> &str {
    match prompt.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &prompt[..idx],
        None => prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(GenerationErrorKind::RateLimited.is_retryable());
        assert!(!GenerationErrorKind::QuotaExceeded.is_retryable());
        assert!(!GenerationErrorKind::AuthError.is_retryable());
        assert!(!GenerationErrorKind::Other.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let error = GenerationError::rate_limited("Too many requests");
        assert_eq!(error.to_string(), "rate_limited: Too many requests");
    }

    #[test]
    fn test_placeholders() {
        let prompt = "What is semantic caching?";

        assert_eq!(
            GenerationError::quota_exceeded("x").placeholder(prompt),
            "[QUOTA_EXCEEDED] Unable to generate response for: 'What is semantic caching?...' - Please check your OpenAI billing."
        );
        assert_eq!(
            GenerationError::rate_limited("x").placeholder(prompt),
            "[RATE_LIMITED] Please try again later for: 'What is semantic caching?...'"
        );
        assert_eq!(
            GenerationError::auth("x").placeholder(prompt),
            "[AUTH_ERROR] Invalid API key for: 'What is semantic caching?...'"
        );
        assert_eq!(
            GenerationError::other("x").placeholder(prompt),
            "[API_ERROR] Mock response for: 'What is semantic caching?...' (OpenAI API not available)"
        );
    }

    #[test]
    fn test_prompt_preview_truncates_on_char_boundary() {
        let long = "é".repeat(80);
        let preview = prompt_preview(&long);

        assert_eq!(preview.chars().count(), 50);
        assert_eq!(prompt_preview("short"), "short");
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&GenerationErrorKind::QuotaExceeded).unwrap(),
            "\"quota_exceeded\""
        );
    }
}
