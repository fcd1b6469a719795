use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::{HttpClientTrait, HttpError};
use crate::domain::{CompletionRequest, GenerationError, Generator};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// OpenAI chat completions generator
#[derive(Debug)]
pub struct OpenAiGenerator<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl<C: HttpClientTrait> OpenAiGenerator<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens),
            "temperature": request.temperature.unwrap_or(self.temperature),
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, GenerationError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            GenerationError::other(format!("Failed to parse response: {}", e))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::other("No response from OpenAI API"))
    }
}

#[async_trait]
impl<C: HttpClientTrait> Generator for OpenAiGenerator<C> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let url = self.chat_completions_url();
        let body = self.build_request(request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(classify_http_error)?;

        self.parse_response(response)
    }
}

/// Map a failed call onto a [`GenerationError`] using the HTTP status and the
/// structured `error.code` / `error.type` fields of the body
pub fn classify_http_error(error: HttpError) -> GenerationError {
    match error {
        HttpError::Status { status, body } => classify_status(status, &body),
        HttpError::Transport(message) | HttpError::Decode(message) => {
            GenerationError::other(message)
        }
    }
}

fn classify_status(status: u16, body: &str) -> GenerationError {
    let detail = serde_json::from_str::<OpenAiErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();

    let message = detail
        .message
        .clone()
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body));

    if detail.is("insufficient_quota") {
        GenerationError::quota_exceeded(message)
    } else if status == 401 || detail.is("invalid_api_key") || detail.is("authentication_error")
    {
        GenerationError::auth(message)
    } else if status == 429 || detail.is("rate_limit_exceeded") {
        GenerationError::rate_limited(message)
    } else {
        GenerationError::other(message)
    }
}

// OpenAI API types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
}

impl OpenAiErrorDetail {
    fn is(&self, value: &str) -> bool {
        self.code.as_deref() == Some(value) || self.error_type.as_deref() == Some(value)
    }
}
