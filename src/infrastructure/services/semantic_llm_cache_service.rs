//! Semantic LLM response caching service
//!
//! Resolves a prompt to a response, reusing the answer of a semantically
//! similar earlier prompt when the similarity cache has one and generating
//! (then caching) a fresh answer otherwise.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::embedding::{Embedder, Embedding};
use crate::domain::llm::{CompletionRequest, StatusReport, check_status, prompt_preview};
use crate::domain::semantic_cache::{SemanticCacheStats, SimilarityCache};
use crate::domain::DomainError;
use crate::infrastructure::llm::RetryingGenerator;
use crate::infrastructure::observability::{
    record_cache_lookup, record_cache_store_failure, record_resolve,
};

/// Outcome of [`SemanticLlmCacheService::resolve`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub response: String,
    pub cache_hit: bool,
    /// Distance to the matched entry on a hit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    /// The response is a placeholder standing in for a failed generation
    pub degraded: bool,
}

impl Resolution {
    fn hit(response: String, distance: f32) -> Self {
        Self {
            response,
            cache_hit: true,
            distance: Some(distance),
            degraded: false,
        }
    }

    fn generated(response: String) -> Self {
        Self {
            response,
            cache_hit: false,
            distance: None,
            degraded: false,
        }
    }

    fn placeholder(response: String) -> Self {
        Self {
            response,
            cache_hit: false,
            distance: None,
            degraded: true,
        }
    }
}

/// Cache-or-generate orchestrator
///
/// Holds no mutable state; every cache interaction sits behind its own
/// failure boundary so a broken cache only costs the optimisation.
pub struct SemanticLlmCacheService {
    cache: Option<Arc<dyn SimilarityCache>>,
    embedder: Arc<dyn Embedder>,
    generator: RetryingGenerator,
}

impl std::fmt::Debug for SemanticLlmCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticLlmCacheService")
            .field("cache", &self.cache)
            .field("embedder", &self.embedder)
            .field("generator", &self.generator)
            .finish()
    }
}

impl SemanticLlmCacheService {
    pub fn new(
        cache: Option<Arc<dyn SimilarityCache>>,
        embedder: Arc<dyn Embedder>,
        generator: RetryingGenerator,
    ) -> Self {
        Self {
            cache,
            embedder,
            generator,
        }
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache_backend(&self) -> Option<&'static str> {
        self.cache.as_ref().map(|c| c.backend_name())
    }

    pub fn embedder_model(&self) -> &str {
        self.embedder.model()
    }

    /// Resolve a prompt, preferring a cached semantically equivalent answer
    pub async fn resolve(&self, prompt: &str) -> Result<Resolution, DomainError> {
        if prompt.is_empty() {
            return Err(DomainError::empty_input("Prompt cannot be empty"));
        }

        let started = Instant::now();
        let mut embedding = None;

        if let Some(cache) = &self.cache {
            match self.lookup(cache.as_ref(), prompt).await {
                Lookup::Hit(resolution) => {
                    record_resolve(started.elapsed(), true, false);
                    return Ok(resolution);
                }
                Lookup::Miss(computed) => embedding = computed,
            }
        }

        let resolution = self.generate(prompt).await;

        if let (Some(cache), Some(embedding)) = (&self.cache, &embedding) {
            if !resolution.degraded {
                self.store(cache.as_ref(), prompt, &resolution.response, embedding)
                    .await;
            }
        }

        record_resolve(started.elapsed(), false, resolution.degraded);
        Ok(resolution)
    }

    /// Run the backend status check
    pub async fn status(&self) -> StatusReport {
        check_status(self.generator.inner()).await
    }

    pub async fn cache_stats(&self) -> Result<Option<SemanticCacheStats>, DomainError> {
        match &self.cache {
            Some(cache) => Ok(Some(cache.stats().await?)),
            None => Ok(None),
        }
    }

    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        if let Some(cache) = &self.cache {
            cache.clear().await?;
            info!(backend = cache.backend_name(), "Semantic cache cleared");
        }

        Ok(())
    }

    /// Embed and check; every failure degrades to a miss
    async fn lookup(&self, cache: &dyn SimilarityCache, prompt: &str) -> Lookup {
        let embedding = match self.embedder.embed(prompt).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to embed prompt for cache lookup: {}", e);
                record_cache_lookup(cache.backend_name(), "error");
                return Lookup::Miss(None);
            }
        };

        match cache.check(prompt, &embedding).await {
            Ok(Some(hit)) => {
                debug!(
                    distance = hit.distance,
                    matched = %prompt_preview(&hit.prompt),
                    "Semantic cache hit"
                );
                record_cache_lookup(cache.backend_name(), "hit");
                Lookup::Hit(Resolution::hit(hit.response, hit.distance))
            }
            Ok(None) => {
                debug!("Semantic cache miss for: {}...", prompt_preview(prompt));
                record_cache_lookup(cache.backend_name(), "miss");
                Lookup::Miss(Some(embedding))
            }
            Err(e) => {
                warn!("Semantic cache check failed, treating as miss: {}", e);
                record_cache_lookup(cache.backend_name(), "error");
                Lookup::Miss(Some(embedding))
            }
        }
    }

    /// Retrying call, then one direct call, then a placeholder
    async fn generate(&self, prompt: &str) -> Resolution {
        let request = CompletionRequest::new(prompt);

        let retried = match self.generator.generate(&request).await {
            Ok(text) => return Resolution::generated(text),
            Err(e) => e,
        };

        warn!(kind = %retried.kind(), "Generation failed, trying a direct call: {}", retried);

        match self.generator.generate_direct(&request).await {
            Ok(text) => Resolution::generated(text),
            Err(e) => {
                warn!(kind = %e.kind(), "Direct generation failed, returning placeholder: {}", e);
                Resolution::placeholder(e.placeholder(prompt))
            }
        }
    }

    async fn store(
        &self,
        cache: &dyn SimilarityCache,
        prompt: &str,
        response: &str,
        embedding: &Embedding,
    ) {
        match cache.store(prompt, response, embedding).await {
            Ok(()) => debug!("Cached response for: {}...", prompt_preview(prompt)),
            Err(e @ DomainError::DimensionMismatch { .. }) => {
                warn!("Not caching response: {}", e);
                record_cache_store_failure(cache.backend_name(), "dimension_mismatch");
            }
            Err(e) => {
                warn!("Failed to cache response: {}", e);
                record_cache_store_failure(cache.backend_name(), "error");
            }
        }
    }
}

enum Lookup {
    Hit(Resolution),
    /// Carries the embedding when one was computed, for the later store
    Miss(Option<Embedding>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::domain::embedding::MockEmbedder;
    use crate::domain::llm::{ApiStatus, GenerationError, MockGenerator, RetryPolicy};
    use crate::domain::semantic_cache::{CacheHit, SemanticCacheConfig};
    use crate::infrastructure::embedding::HashingEmbedder;
    use crate::infrastructure::semantic_cache::InMemorySimilarityCache;

    /// Cache whose backend is unreachable
    #[derive(Debug)]
    struct DownCache;

    #[async_trait]
    impl SimilarityCache for DownCache {
        async fn check(&self, _: &str, _: &Embedding) -> Result<Option<CacheHit>, DomainError> {
            Err(DomainError::cache("connection refused"))
        }

        async fn store(&self, _: &str, _: &str, _: &Embedding) -> Result<(), DomainError> {
            Err(DomainError::cache("connection refused"))
        }

        async fn clear(&self) -> Result<(), DomainError> {
            Err(DomainError::cache("connection refused"))
        }

        async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
            Err(DomainError::cache("connection refused"))
        }

        fn dimensions(&self) -> usize {
            768
        }

        fn distance_threshold(&self) -> f32 {
            0.1
        }

        fn backend_name(&self) -> &'static str {
            "down"
        }
    }

    fn in_memory(dims: usize) -> Arc<InMemorySimilarityCache> {
        Arc::new(InMemorySimilarityCache::new(
            SemanticCacheConfig::new().with_dimensions(dims),
        ))
    }

    fn service(
        cache: Option<Arc<dyn SimilarityCache>>,
        embedder: Arc<MockEmbedder>,
        generator: MockGenerator,
    ) -> SemanticLlmCacheService {
        SemanticLlmCacheService::new(
            cache,
            embedder,
            RetryingGenerator::new(Arc::new(generator), RetryPolicy::default()),
        )
    }

    fn answering(times: usize, text: &'static str) -> MockGenerator {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .times(times)
            .returning(move |_| Ok(text.to_string()));
        generator
    }

    #[tokio::test]
    async fn test_second_call_is_cache_hit() {
        let cache = in_memory(768);
        let service = service(
            Some(cache.clone()),
            Arc::new(MockEmbedder::new(768)),
            answering(1, "Semantic caching reuses answers."),
        );

        let first = service.resolve("What is semantic caching?").await.unwrap();
        let second = service.resolve("What is semantic caching?").await.unwrap();

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(second.response, "Semantic caching reuses answers.");
        assert!(second.distance.unwrap() < 1e-4);
        assert_eq!(cache.stats().await.unwrap().total_entries, 1);
    }

    #[tokio::test]
    async fn test_symbol_only_prompt_hits_on_repeat() {
        let cache = in_memory(768);
        let service = SemanticLlmCacheService::new(
            Some(cache.clone()),
            Arc::new(HashingEmbedder::default()),
            RetryingGenerator::new(
                Arc::new(answering(1, "Could you clarify the question?")),
                RetryPolicy::default(),
            ),
        );

        let first = service.resolve("???").await.unwrap();
        let second = service.resolve("???").await.unwrap();

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(second.response, "Could you clarify the question?");
        assert_eq!(cache.stats().await.unwrap().total_entries, 1);
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_any_call() {
        let embedder = Arc::new(MockEmbedder::new(768));
        let service = service(Some(in_memory(768)), embedder.clone(), answering(0, "unused"));

        let err = service.resolve("").await.unwrap_err();

        assert!(matches!(err, DomainError::EmptyInput { .. }));
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_down_still_answers() {
        let service = service(
            Some(Arc::new(DownCache)),
            Arc::new(MockEmbedder::new(768)),
            answering(1, "fresh answer"),
        );

        let resolution = service.resolve("What is Redis?").await.unwrap();

        assert_eq!(resolution.response, "fresh answer");
        assert!(!resolution.cache_hit);
        assert!(!resolution.degraded);
    }

    #[tokio::test]
    async fn test_embedder_failure_is_a_miss_without_store() {
        let cache = in_memory(768);
        let service = service(
            Some(cache.clone()),
            Arc::new(MockEmbedder::new(768).with_error("model not loaded")),
            answering(1, "fresh answer"),
        );

        let resolution = service.resolve("What is Redis?").await.unwrap();

        assert_eq!(resolution.response, "fresh answer");
        assert_eq!(cache.stats().await.unwrap().total_entries, 0);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_does_not_affect_response() {
        let cache = in_memory(768);
        let service = service(
            Some(cache.clone()),
            Arc::new(MockEmbedder::new(384)),
            answering(2, "fresh answer"),
        );

        let first = service.resolve("What is Redis?").await.unwrap();
        let second = service.resolve("What is Redis?").await.unwrap();

        assert_eq!(first.response, "fresh answer");
        assert!(!second.cache_hit);
        assert_eq!(cache.stats().await.unwrap().total_entries, 0);
    }

    #[tokio::test]
    async fn test_without_cache_always_generates() {
        let embedder = Arc::new(MockEmbedder::new(768));
        let service = service(None, embedder.clone(), answering(2, "answer"));

        service.resolve("q").await.unwrap();
        let second = service.resolve("q").await.unwrap();

        assert!(!second.cache_hit);
        assert_eq!(embedder.calls(), 0);
        assert!(service.cache_stats().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_direct_call_rescues_failed_retries() {
        let mut generator = MockGenerator::new();
        let mut seq = mockall::Sequence::new();
        generator
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(GenerationError::other("HTTP 502")));
        generator
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("second try".to_string()));

        let cache = in_memory(768);
        let service = service(Some(cache.clone()), Arc::new(MockEmbedder::new(768)), generator);

        let resolution = service.resolve("What is Redis?").await.unwrap();

        assert_eq!(resolution.response, "second try");
        assert!(!resolution.degraded);
        assert_eq!(cache.stats().await.unwrap().total_entries, 1);
    }

    #[tokio::test]
    async fn test_placeholder_is_returned_and_not_cached() {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .times(2)
            .returning(|_| Err(GenerationError::quota_exceeded("insufficient_quota")));

        let cache = in_memory(768);
        let service = service(Some(cache.clone()), Arc::new(MockEmbedder::new(768)), generator);

        let resolution = service.resolve("What is Redis?").await.unwrap();

        assert!(resolution.degraded);
        assert!(resolution.response.starts_with("[QUOTA_EXCEEDED]"));
        assert!(resolution.response.contains("What is Redis?"));
        assert_eq!(cache.stats().await.unwrap().total_entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_placeholder_after_backoff() {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .times(4)
            .returning(|_| Err(GenerationError::rate_limited("slow down")));

        let service = service(None, Arc::new(MockEmbedder::new(768)), generator);

        let resolution = service.resolve("What is Redis?").await.unwrap();

        assert!(resolution.response.starts_with("[RATE_LIMITED]"));
    }

    #[tokio::test]
    async fn test_status_uses_backend() {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .times(1)
            .returning(|_| Err(GenerationError::auth("invalid_api_key")));

        let service = service(None, Arc::new(MockEmbedder::new(768)), generator);

        assert_eq!(service.status().await.status, ApiStatus::AuthError);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let cache = in_memory(768);
        let service = service(
            Some(cache.clone()),
            Arc::new(MockEmbedder::new(768)),
            answering(2, "answer"),
        );

        service.resolve("q").await.unwrap();
        service.clear_cache().await.unwrap();
        let after = service.resolve("q").await.unwrap();

        assert!(!after.cache_hit);
        assert_eq!(service.cache_backend(), Some("in_memory"));
    }
}
