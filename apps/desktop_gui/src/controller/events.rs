//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{GatewayError, GenerationTicket, RemixTicket};
use shared::domain::{LearningModule, ScreenPoint};

/// Results coming back from the backend worker.
#[derive(Debug)]
pub enum UiEvent {
    ModuleGenerated {
        ticket: GenerationTicket,
        result: Result<LearningModule, GatewayError>,
    },
    FragmentRemixed {
        ticket: RemixTicket,
        result: Result<String, GatewayError>,
    },
    Error(UiError),
}

/// What the user asked for while a frame was drawn; applied after rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum UiIntent {
    EditInput(String),
    AttachImage { bytes: Vec<u8>, mime_type: String },
    ClearImage,
    Submit,
    DismissNotice,
    Answer {
        question_id: String,
        option_id: String,
        at: ScreenPoint,
    },
    Remix {
        index: usize,
        text: String,
        at: ScreenPoint,
    },
    StartOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    AttachImage,
    Generation,
    Remix,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthenticated")
            || message_lower.contains("permission_denied")
            || message_lower.contains("api key")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("unsupported")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status banner.
    pub fn banner_text(&self) -> String {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, _) => {
                format!("Backend worker failed to start: {}", self.message)
            }
            (_, UiErrorCategory::Auth) => {
                "The content service rejected the API key; check GEMINI_API_KEY and relaunch."
                    .to_string()
            }
            (UiErrorContext::AttachImage, _) => self.message.clone(),
            (_, UiErrorCategory::Transport) => {
                format!("Content service unreachable: {}", self.message)
            }
            _ => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{UiError, UiErrorCategory, UiErrorContext};

    #[test]
    fn classifies_rejected_api_key_as_auth() {
        let err = UiError::from_message(
            UiErrorContext::Generation,
            "content service rejected the request: PERMISSION_DENIED (403): API key not valid",
        );
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert!(err.banner_text().contains("API key"));
    }

    #[test]
    fn classifies_non_image_attachment_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::AttachImage,
            "unsupported attachment type 'application/pdf': please upload an image file",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::AttachImage);
        assert_eq!(err.banner_text(), err.message());
    }

    #[test]
    fn classifies_backend_disconnect_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::Generation,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn startup_failures_keep_their_context_in_the_banner() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "no API key configured; set GEMINI_API_KEY or api_key in focusflow.toml",
        );
        assert!(err.banner_text().starts_with("Backend worker failed to start"));
    }
}
