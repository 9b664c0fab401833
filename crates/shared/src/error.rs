use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error kinds a front-end can observe from the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Input,
    Generation,
}

/// Error body returned by the content service on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamErrorEnvelope {
    pub error: UpstreamError,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{status} ({code}): {message}")]
pub struct UpstreamError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl UpstreamError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: String::new(),
        }
    }

    /// Parses the service envelope, falling back to the raw body text.
    pub fn from_body(code: u16, body: &str) -> Self {
        match serde_json::from_str::<UpstreamErrorEnvelope>(body) {
            Ok(envelope) => {
                let mut error = envelope.error;
                if error.code == 0 {
                    error.code = code;
                }
                error
            }
            Err(_) => Self::new(code, body.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_envelope() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        let error = UpstreamError::from_body(403, body);
        assert_eq!(error.code, 403);
        assert_eq!(error.status, "PERMISSION_DENIED");
        assert_eq!(error.to_string(), "PERMISSION_DENIED (403): API key not valid");
    }

    #[test]
    fn falls_back_to_raw_body() {
        let error = UpstreamError::from_body(502, " bad gateway \n");
        assert_eq!(error.code, 502);
        assert_eq!(error.message, "bad gateway");
    }
}
