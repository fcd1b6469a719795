//! Status command - diagnoses OpenAI API access

use crate::domain::llm::{ApiStatus, BILLING_URL, StatusReport, check_status};

const API_KEYS_URL: &str = "https://platform.openai.com/api-keys";

/// Check the backend and print guidance for the detected condition
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    println!("OpenAI API Status Checker");
    println!("{}", "=".repeat(40));

    let Some(api_key) = config.openai.api_key.as_deref() else {
        println!("OPENAI_API_KEY not found in environment variables");
        println!("Add OPENAI_API_KEY to your .env file");
        return Ok(());
    };

    println!("API Key Found: {}", mask_api_key(api_key));
    println!("\nChecking OpenAI API status...");

    let generator = crate::create_generator(&config)?;
    let report = check_status(generator.as_ref()).await;

    println!("Status: {}", report.status.as_str().to_uppercase());
    println!("Message: {}", report.message);
    println!();

    for line in guidance(&report) {
        println!("{}", line);
    }

    println!("\n{}", "=".repeat(40));
    println!("Usage & Billing: {}", BILLING_URL);
    println!("API Keys: {}", API_KEYS_URL);

    Ok(())
}

/// `first8...last4`, or `***` for keys too short to mask
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();

    if chars.len() <= 12 {
        return "***".to_string();
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn guidance(report: &StatusReport) -> Vec<String> {
    match report.status {
        ApiStatus::Ok => vec![
            "OpenAI API is working correctly.".to_string(),
            "   You can proceed with semantic cache operations.".to_string(),
        ],
        ApiStatus::QuotaExceeded => vec![
            "QUOTA EXCEEDED - Action Required:".to_string(),
            "   1. Visit your OpenAI billing dashboard:".to_string(),
            format!(
                "      {}",
                report.action_url.as_deref().unwrap_or(BILLING_URL)
            ),
            "   2. Check your current usage and limits".to_string(),
            "   3. Add credits or upgrade your plan".to_string(),
            "   Cached responses keep being served meanwhile.".to_string(),
        ],
        ApiStatus::RateLimited => vec![
            "RATE LIMITED - Temporary Issue:".to_string(),
            "   - Wait a few minutes before trying again".to_string(),
            "   - Generation retries automatically with backoff".to_string(),
        ],
        ApiStatus::AuthError => vec![
            "AUTHENTICATION ERROR:".to_string(),
            "   1. Check your .env file has the correct OPENAI_API_KEY".to_string(),
            format!("   2. Verify the API key is valid at: {}", API_KEYS_URL),
            "   3. Make sure the key hasn't expired".to_string(),
        ],
        ApiStatus::Error => vec![
            "UNEXPECTED ERROR:".to_string(),
            format!("   {}", report.message),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::GenerationError;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("sk-proj-abcdefghijklmnop1234"), "sk-proj-...1234");
    }

    #[test]
    fn test_mask_short_key() {
        assert_eq!(mask_api_key("sk-short"), "***");
        assert_eq!(mask_api_key("123456789012"), "***");
    }

    #[test]
    fn test_quota_guidance_links_billing() {
        let report = StatusReport::from_error(&GenerationError::quota_exceeded("insufficient_quota"));

        let lines = guidance(&report);

        assert!(lines[0].starts_with("QUOTA EXCEEDED"));
        assert!(lines.iter().any(|l| l.contains(BILLING_URL)));
    }

    #[test]
    fn test_auth_guidance_mentions_key() {
        let report = StatusReport::from_error(&GenerationError::auth("Incorrect API key"));

        assert!(guidance(&report).iter().any(|l| l.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn test_ok_guidance() {
        assert!(guidance(&StatusReport::ok())[0].contains("working correctly"));
    }
}
