//! Demo command - caching and similarity demos on the console

use crate::domain::history::QueryRecord;
use crate::infrastructure::services::{CachingDemoReport, SimilarityDemoReport};

const PREVIEW_CHARS: usize = 100;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();
    let state = crate::create_app_state_with_config(&config).await?;

    println!("=== Semantic Caching Demo ===\n");
    let caching = state.demo.caching_demo(None).await?;
    print_caching_report(&caching);

    println!("\n{}", "=".repeat(50));

    println!("\n=== Semantic Similarity Demo ===\n");
    let similarity = state.demo.similarity_demo(None).await?;
    print_similarity_report(&similarity);

    Ok(())
}

fn print_caching_report(report: &CachingDemoReport) {
    if let Some(first) = report.results.first() {
        println!("Test Query: '{}'\n", first.query);
    }

    for record in &report.results {
        let expectation = if record.query_number == Some(1) {
            "Cache Miss Expected"
        } else {
            "Cache Hit Expected"
        };
        println!(
            "Query {} ({}):",
            record.query_number.unwrap_or(record.id as usize),
            expectation
        );
        print_record(record);
    }

    let performance = &report.performance;
    println!("Performance Analysis:");
    println!("   First Query:  {:.2} seconds", performance.first_time);
    println!("   Second Query: {:.2} seconds", performance.second_time);

    if performance.second_time < performance.first_time {
        println!("   Speedup: {:.1}x faster", performance.speedup);
        println!("   Time Saved: {:.2} seconds", performance.time_saved);
    } else {
        println!("   No significant speedup detected (cache might not have been used)");
    }
}

fn print_similarity_report(report: &SimilarityDemoReport) {
    for record in &report.results {
        println!(
            "Query {}: '{}'",
            record.query_number.unwrap_or(record.id as usize),
            record.query
        );
        print_record(record);
    }
}

fn print_record(record: &QueryRecord) {
    println!(
        "   Time taken: {:.2} seconds{}",
        record.time,
        if record.is_cache_hit { " (cache hit)" } else { "" }
    );
    println!("   Response: {}\n", preview(&record.result, PREVIEW_CHARS));
}

/// First `max_chars` characters, with `...` when truncated
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
