//! Generation backend implementations

mod http_client;
mod openai;
mod retrying;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use openai::{
    DEFAULT_CHAT_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, OpenAiGenerator,
    classify_http_error,
};
pub use retrying::RetryingGenerator;
