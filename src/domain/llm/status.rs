//! Backend health classification

use serde::{Deserialize, Serialize};

use super::{CompletionRequest, GenerationError, GenerationErrorKind, Generator};

pub const BILLING_URL: &str = "https://platform.openai.com/settings/organization/billing";

/// Health of the generation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Ok,
    QuotaExceeded,
    RateLimited,
    AuthError,
    Error,
}

impl ApiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::QuotaExceeded => "quota_exceeded",
            Self::RateLimited => "rate_limited",
            Self::AuthError => "auth_error",
            Self::Error => "error",
        }
    }
}

impl From<GenerationErrorKind> for ApiStatus {
    fn from(kind: GenerationErrorKind) -> Self {
        match kind {
            GenerationErrorKind::QuotaExceeded => Self::QuotaExceeded,
            GenerationErrorKind::RateLimited => Self::RateLimited,
            GenerationErrorKind::AuthError => Self::AuthError,
            GenerationErrorKind::Other => Self::Error,
        }
    }
}

/// Result of a status check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: ApiStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl StatusReport {
    pub fn ok() -> Self {
        Self {
            status: ApiStatus::Ok,
            message: "OpenAI API is accessible".to_string(),
            action_url: None,
        }
    }

    pub fn from_error(error: &GenerationError) -> Self {
        let status = ApiStatus::from(error.kind());

        let (message, action_url) = match status {
            ApiStatus::QuotaExceeded => (
                "Quota exceeded. Please check your OpenAI billing.".to_string(),
                Some(BILLING_URL.to_string()),
            ),
            ApiStatus::RateLimited => ("Rate limit exceeded. Please wait.".to_string(), None),
            ApiStatus::AuthError => (
                "Invalid API key. Check your OPENAI_API_KEY.".to_string(),
                None,
            ),
            ApiStatus::Ok | ApiStatus::Error => (format!("API Error: {}", error.message()), None),
        };

        Self {
            status,
            message,
            action_url,
        }
    }
}

/// Issue a minimal generation call and classify the outcome
pub async fn check_status(generator: &dyn Generator) -> StatusReport {
    let request = CompletionRequest::new("Hello").with_max_tokens(5);

    match generator.complete(&request).await {
        Ok(_) => StatusReport::ok(),
        Err(e) => {
            tracing::warn!(kind = %e.kind(), "Generation backend status check failed: {}", e);
            StatusReport::from_error(&e)
        }
    }
}
