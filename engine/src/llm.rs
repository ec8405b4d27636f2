use std::pin::Pin;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::{ClientBox, prompt::GenerationRequest};

mod gemini;
pub use gemini::Gemini;

pub trait GenerationClient {
    /// One blocking round trip to the service. No retries, no streaming.
    fn generate<'a>(
        &'a self,
        req: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<OutputMessage, ServiceError>> + Send + 'a>>;

    fn model(&self) -> Model;
}

#[derive(Debug, Clone, Default)]
pub struct OutputMessage {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    /// Why the service stopped, or why it refused to answer at all.
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum ServiceErrorKind {
    Authentication,
    Quota,
    #[strum(to_string = "invalid request")]
    InvalidRequest,
    #[strum(to_string = "not found")]
    NotFound,
    Unavailable,
    Network,
    #[strum(to_string = "malformed response")]
    MalformedResponse,
    Other,
}

/// Any failure of the external call itself. The provider's message is kept verbatim.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    clap::ValueEnum,
    Serialize,
    Deserialize,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    Default,
)]
pub enum Model {
    #[strum(to_string = "gemini-1.5-flash")]
    #[value(name = "gemini-1.5-flash")]
    Gemini15Flash,
    #[strum(to_string = "gemini-2.0-flash")]
    #[value(name = "gemini-2.0-flash")]
    Gemini20Flash,
    #[default]
    #[strum(to_string = "gemini-2.5-flash")]
    #[value(name = "gemini-2.5-flash")]
    Gemini25Flash,
    #[strum(to_string = "gemini-2.5-pro")]
    #[value(name = "gemini-2.5-pro")]
    Gemini25Pro,
}

impl Model {
    pub fn make(&self, api_key: String) -> ClientBox {
        Box::new(Gemini::new(api_key, *self))
    }
}
