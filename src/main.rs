use clap::Parser;
use semantic_llm_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Status => cli::status::run().await,
        Command::Demo => cli::demo::run().await,
        Command::Query { prompt } => cli::query::run(prompt).await,
    }
}
