//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, EmbeddingProvider, HistoryConfig, LogFormat, LoggingConfig,
    OpenAiConfig, ServerConfig,
};
