//! Infrastructure services

mod demo_service;
mod semantic_llm_cache_service;

pub use demo_service::{
    CachingDemoReport, DemoConfig, DemoRunner, PerformanceSummary, SimilarityDemoReport,
};
pub use semantic_llm_cache_service::{Resolution, SemanticLlmCacheService};
