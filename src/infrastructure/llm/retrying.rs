//! Exponential-backoff wrapper around a [`Generator`]

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CompletionRequest, GenerationError, Generator, RetryPolicy};
use crate::infrastructure::observability::{record_generation_attempt, record_generation_retry};

/// Retries rate-limited calls; quota, auth and other failures return immediately
pub struct RetryingGenerator {
    inner: Arc<dyn Generator>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for RetryingGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingGenerator")
            .field("policy", &self.policy)
            .finish()
    }
}

impl RetryingGenerator {
    pub fn new(inner: Arc<dyn Generator>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The wrapped backend, for calls that bypass the policy
    pub fn inner(&self) -> &dyn Generator {
        self.inner.as_ref()
    }

    /// Call the backend under the retry policy
    pub async fn generate(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.call(request).await {
                Ok(text) => return Ok(text),
                Err(e) => e,
            };

            if !error.kind().is_retryable() || attempt >= attempts {
                debug!(attempt, kind = %error.kind(), "Giving up on generation");
                return Err(error);
            }

            let delay = self.policy.delay_for_attempt(attempt - 1);
            warn!(
                attempt,
                max_attempts = attempts,
                delay_ms = delay.as_millis() as u64,
                "Rate limited, retrying: {}",
                error
            );
            record_generation_retry(delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Single call with no retries
    pub async fn generate_direct(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, GenerationError> {
        self.call(request).await
    }

    async fn call(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let result = self.inner.complete(request).await;

        match &result {
            Ok(_) => record_generation_attempt("success"),
            Err(e) => record_generation_attempt(e.kind().as_str()),
        }

        result
    }
}
