//! Content generation gateway: the only boundary to the generative service.

use async_trait::async_trait;
use shared::domain::{ImageAttachment, LearningModule};

use crate::error::GatewayError;

mod gemini;
pub mod prompts;
pub mod schema;

pub use gemini::GeminiGateway;

/// Text and/or image a module is generated from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationInput {
    pub text: String,
    pub image: Option<ImageAttachment>,
}

impl GenerationInput {
    pub fn new(text: impl Into<String>, image: Option<ImageAttachment>) -> Self {
        Self {
            text: text.into(),
            image,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_text() && self.image.is_none()
    }
}

#[async_trait]
pub trait ContentGateway: Send + Sync {
    async fn generate_module(&self, input: &GenerationInput)
        -> Result<LearningModule, GatewayError>;
    async fn remix_fragment(&self, text: &str) -> Result<String, GatewayError>;
}

#[cfg(test)]
#[path = "../tests/gateway_tests.rs"]
mod http_tests;
