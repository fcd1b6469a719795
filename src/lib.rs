//! Semantic LLM cache
//!
//! Answers prompts through an LLM, reusing the response of an earlier prompt
//! whose embedding lies within a cosine-distance threshold:
//! - Similarity caches backed by memory or Redis
//! - Retrying generation with exponential backoff on rate limits
//! - Backend status classification (quota, rate limit, auth)
//! - Query history and caching demos over HTTP and the command line

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::EmbeddingProvider;
use domain::embedding::Embedder;
use domain::history::QueryHistory;
use domain::llm::Generator;
use infrastructure::embedding::{
    DEFAULT_EMBEDDING_MODEL, HashingEmbedder, OpenAiEmbedder, model_dimensions,
};
use infrastructure::llm::{HttpClient, OpenAiGenerator, RetryingGenerator};
use infrastructure::semantic_cache::SimilarityCacheFactory;
use infrastructure::services::{DemoRunner, SemanticLlmCacheService};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let service = Arc::new(create_cache_service(config).await?);
    let history = Arc::new(QueryHistory::new(config.history.max_records));
    let demo = Arc::new(DemoRunner::new(
        service.clone(),
        history.clone(),
        config.demo.clone(),
    ));

    Ok(AppState::new(service, history, demo))
}

/// Wire embedder, similarity cache and retrying generator together
pub async fn create_cache_service(config: &AppConfig) -> anyhow::Result<SemanticLlmCacheService> {
    let embedder = create_embedder(config)?;
    let generator = RetryingGenerator::new(create_generator(config)?, config.retry.clone());

    // A mismatch is kept as configured; every store then fails with DimensionMismatch
    if config.semantic_cache.enabled && config.semantic_cache.dimensions != embedder.dimensions() {
        warn!(
            configured = config.semantic_cache.dimensions,
            embedder = embedder.dimensions(),
            "Cache dimensions differ from the embedder, responses will not be cached"
        );
    }

    let cache = SimilarityCacheFactory::new()
        .create_or_disable(&config.semantic_cache)
        .await;

    Ok(SemanticLlmCacheService::new(cache, embedder, generator))
}

/// OpenAI chat generator; a missing key is logged and every call then
/// classifies as an auth error
pub fn create_generator(config: &AppConfig) -> anyhow::Result<Arc<dyn Generator>> {
    let openai = &config.openai;
    let client = HttpClient::with_timeout(Duration::from_secs(openai.timeout_secs))?;
    let api_key = openai_api_key(config);

    let generator = match &openai.base_url {
        Some(url) => {
            info!("Using OpenAI generator with custom base URL: {}", url);
            OpenAiGenerator::with_base_url(client, api_key, url)
        }
        None => OpenAiGenerator::new(client, api_key),
    };

    Ok(Arc::new(
        generator
            .with_model(&openai.chat_model)
            .with_max_tokens(openai.max_tokens)
            .with_temperature(openai.temperature),
    ))
}

pub fn create_embedder(config: &AppConfig) -> anyhow::Result<Arc<dyn Embedder>> {
    let embedding = &config.embedding;

    match embedding.provider {
        EmbeddingProvider::Hashing => {
            info!(dimensions = embedding.dimensions, "Using local feature-hashing embedder");
            Ok(Arc::new(HashingEmbedder::new(embedding.dimensions)?))
        }
        EmbeddingProvider::OpenAi => {
            let client =
                HttpClient::with_timeout(Duration::from_secs(config.openai.timeout_secs))?;
            let api_key = openai_api_key(config);
            let model = embedding
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());

            let embedder = match &config.openai.base_url {
                Some(url) => OpenAiEmbedder::with_base_url(client, api_key, url),
                None => OpenAiEmbedder::new(client, api_key),
            }
            .with_model(&model);

            let embedder = if model_dimensions(&model) == Some(embedding.dimensions) {
                embedder
            } else {
                embedder.with_dimensions(embedding.dimensions)
            };

            info!(model = %model, dimensions = embedding.dimensions, "Using OpenAI embedder");
            Ok(Arc::new(embedder))
        }
    }
}

fn openai_api_key(config: &AppConfig) -> String {
    match &config.openai.api_key {
        Some(key) => key.clone(),
        None => {
            warn!("OPENAI_API_KEY is not set, OpenAI calls will fail authentication");
            String::new()
        }
    }
}
