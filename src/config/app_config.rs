use serde::Deserialize;

use crate::domain::llm::RetryPolicy;
use crate::domain::semantic_cache::SemanticCacheConfig;
use crate::infrastructure::embedding::DEFAULT_HASHING_DIMENSIONS;
use crate::infrastructure::llm::{DEFAULT_CHAT_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::services::DemoConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub openai: OpenAiConfig,
    pub embedding: EmbeddingConfig,
    pub semantic_cache: SemanticCacheConfig,
    pub retry: RetryPolicy,
    pub history: HistoryConfig,
    pub demo: DemoConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// OpenAI connection settings shared by the generator and the embedder
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub chat_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProvider {
    /// Local feature hashing, no network
    #[default]
    Hashing,
    #[serde(alias = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    /// Model name (OpenAI provider only)
    pub model: Option<String>,
    pub dimensions: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_records: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: 60,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            model: None,
            dimensions: DEFAULT_HASHING_DIMENSIONS,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_records: 1000 }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_overrides(|name| std::env::var(name).ok());

        Ok(app_config)
    }

    /// Honour the conventional `OPENAI_API_KEY`, `OPENAI_BASE_URL` and
    /// `REDIS_URL` / `RDS_URI` variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }

        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.openai.base_url = Some(url);
        }

        if let Some(url) = non_empty("REDIS_URL").or_else(|| non_empty("RDS_URI")) {
            self.semantic_cache.redis_url = Some(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::semantic_cache::CacheBackend;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_usable() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.openai.chat_model, "gpt-4o-mini");
        assert_eq!(config.openai.max_tokens, 500);
        assert_eq!(config.embedding.provider, EmbeddingProvider::Hashing);
        assert_eq!(config.embedding.dimensions, config.semantic_cache.dimensions);
        assert_eq!(config.semantic_cache.backend, CacheBackend::InMemory);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.history.max_records, 1000);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000"),
            ("RDS_URI", "redis://cache:6379"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(
            config.semantic_cache.redis_url.as_deref(),
            Some("redis://cache:6379")
        );
    }

    #[test]
    fn test_redis_url_preferred_over_rds_uri() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| match name {
            "REDIS_URL" => Some("redis://primary".to_string()),
            "RDS_URI" => Some("redis://secondary".to_string()),
            _ => None,
        });

        assert_eq!(config.semantic_cache.redis_url.as_deref(), Some("redis://primary"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| match name {
            "OPENAI_API_KEY" => Some("  ".to_string()),
            _ => None,
        });

        assert!(config.openai.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.openai.api_key = Some("sk-secret".to_string());

        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_str(
            r#"{"semantic_cache": {"backend": "redis"}, "embedding": {"provider": "openai"}}"#,
        )
        .unwrap();

        assert_eq!(config.semantic_cache.backend, CacheBackend::Redis);
        assert_eq!(config.semantic_cache.name, "llmcache");
        assert_eq!(config.embedding.provider, EmbeddingProvider::OpenAi);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
