use shared::error::{ErrorKind, UpstreamError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no usable input: supply text, an image, or both")]
    NoInput,
    #[error("content service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("content service rejected the request: {0}")]
    Upstream(UpstreamError),
    #[error("content service returned no content")]
    EmptyResponse,
    #[error("generated module violates the schema: {0}")]
    Schema(String),
    #[error("content gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoInput => ErrorKind::Input,
            Self::Transport(_)
            | Self::Upstream(_)
            | Self::EmptyResponse
            | Self::Schema(_)
            | Self::Unavailable(_) => ErrorKind::Generation,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Schema(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unsupported attachment type '{mime_type}': please upload an image file")]
    NotAnImage { mime_type: String },
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAnImage { .. } => ErrorKind::Validation,
        }
    }
}
