//! CLI module for the semantic LLM cache
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `status`: check OpenAI API access and print guidance
//! - `demo`: run the caching and similarity demos on the console
//! - `query`: resolve one prompt

pub mod demo;
pub mod query;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Semantic LLM cache - reuse LLM answers for prompts that mean the same thing
#[derive(Parser)]
#[command(name = "semantic-llm-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Check OpenAI API status (quota, rate limit, key)
    Status,

    /// Run the caching and similarity demos
    Demo,

    /// Resolve a single prompt through the cache
    Query {
        /// Prompt to resolve
        prompt: String,
    },
}

/// Load `.env` and layered configuration, then start logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::try_parse_from(["semantic-llm-cache", "query", "What is Redis?"]).unwrap();

        match cli.command {
            Command::Query { prompt } => assert_eq!(prompt, "What is Redis?"),
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_query_requires_prompt() {
        assert!(Cli::try_parse_from(["semantic-llm-cache", "query"]).is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert!(matches!(
            Cli::try_parse_from(["semantic-llm-cache", "serve"]).unwrap().command,
            Command::Serve
        ));
        assert!(matches!(
            Cli::try_parse_from(["semantic-llm-cache", "status"]).unwrap().command,
            Command::Status
        ));
        assert!(matches!(
            Cli::try_parse_from(["semantic-llm-cache", "demo"]).unwrap().command,
            Command::Demo
        ));
    }
}
