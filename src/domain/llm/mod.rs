//! Text generation domain models and traits

mod error;
mod generator;
mod request;
mod retry;
mod status;

pub use error::{GenerationError, GenerationErrorKind, prompt_preview};
pub use generator::Generator;
pub use request::CompletionRequest;
pub use retry::RetryPolicy;
pub use status::{check_status, ApiStatus, StatusReport, BILLING_URL};

#[cfg(test)]
pub use generator::MockGenerator;
