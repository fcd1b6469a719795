//! Query command - resolves one prompt through the cache

use std::time::Instant;

use crate::domain::DomainError;

pub async fn run(prompt: String) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(DomainError::empty_input("Query cannot be empty").into());
    }

    let service = crate::create_cache_service(&config).await?;

    let started = Instant::now();
    let resolution = service.resolve(prompt).await?;
    let elapsed = started.elapsed().as_secs_f64();

    let source = match (resolution.cache_hit, resolution.degraded) {
        (true, _) => "cache hit",
        (false, true) => "generation failed",
        (false, false) => "generated",
    };

    println!("{}", resolution.response);
    eprintln!("({}, {:.2} seconds)", source, elapsed);

    Ok(())
}
