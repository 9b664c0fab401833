use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use shared::{
    domain::LearningModule,
    error::UpstreamError,
    protocol::{
        Content, ContentRole, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
        Part,
    },
};
use tracing::debug;

use super::{prompts, schema, ContentGateway, GenerationInput};
use crate::{
    config::{Settings, SettingsError},
    error::GatewayError,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Talks to the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiGateway {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiGateway {
    pub fn new(
        base_url: impl Into<String>,
        model: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_client(Client::new(), base_url, model, api_key)
    }

    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        model: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model.as_ref()
            ),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let api_key = settings.api_key()?.to_string();
        let base_url = settings.base_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(
            builder.build()?,
            base_url.as_str(),
            &settings.model,
            api_key,
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn module_request(input: &GenerationInput) -> Result<GenerateContentRequest, GatewayError> {
        if input.is_empty() {
            return Err(GatewayError::NoInput);
        }
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = &input.image {
            parts.push(Part::inline(&image.mime_type, STANDARD.encode(&image.bytes)));
        }
        if input.has_text() {
            parts.push(Part::text(prompts::text_prompt(&input.text)));
        } else {
            parts.push(Part::text(prompts::IMAGE_ONLY_PROMPT));
        }

        Ok(GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(prompts::MODULE_SYSTEM_INSTRUCTION)],
            },
            contents: vec![Content {
                role: Some(ContentRole::User),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: Some(schema::module_response_schema()),
            },
        })
    }

    fn remix_request(sentence: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(prompts::REMIX_SYSTEM_INSTRUCTION)],
            },
            contents: vec![Content {
                role: Some(ContentRole::User),
                parts: vec![Part::text(prompts::remix_prompt(sentence))],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "text/plain".into(),
                response_schema: None,
            },
        }
    }

    async fn send(&self, request: &GenerateContentRequest) -> Result<String, GatewayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!("failed to read error body: {err}");
                    format!("unreadable response body: {err}")
                }
            };
            return Err(GatewayError::Upstream(UpstreamError::from_body(
                status.as_u16(),
                &body,
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        if let Some(reason) = body
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
        {
            debug!(finish_reason = reason, "content service finished");
        }
        body.text().ok_or(GatewayError::EmptyResponse)
    }
}

#[async_trait]
impl ContentGateway for GeminiGateway {
    async fn generate_module(
        &self,
        input: &GenerationInput,
    ) -> Result<LearningModule, GatewayError> {
        let request = Self::module_request(input)?;
        self.send(&request)
            .await
            .and_then(|raw| schema::decode_module(&raw))
    }

    async fn remix_fragment(&self, text: &str) -> Result<String, GatewayError> {
        self.send(&Self::remix_request(text))
            .await
            .map(|raw| raw.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::ImageAttachment;

    use super::*;

    #[test]
    fn image_part_precedes_text_prompt() {
        let input = GenerationInput::new(
            "Photosynthesis",
            Some(ImageAttachment {
                bytes: vec![1, 2, 3],
                mime_type: "image/png".into(),
            }),
        );
        let request = GeminiGateway::module_request(&input).expect("request");
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[0].inline_data.as_ref().map(|d| d.data.as_str()),
            Some("AQID")
        );
        assert!(parts[1]
            .text
            .as_deref()
            .is_some_and(|t| t.ends_with("\n\nPhotosynthesis")));
    }

    #[test]
    fn whitespace_text_without_image_is_no_input() {
        let input = GenerationInput::new("  \n ", None);
        assert!(matches!(
            GeminiGateway::module_request(&input),
            Err(GatewayError::NoInput)
        ));
    }

    #[test]
    fn image_only_input_gets_default_prompt() {
        let input = GenerationInput::new(
            "",
            Some(ImageAttachment {
                bytes: vec![0xff],
                mime_type: "image/jpeg".into(),
            }),
        );
        assert!(!input.is_empty());
        assert!(GenerationInput::default().is_empty());

        let request = GeminiGateway::module_request(&input).expect("request");
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].text.as_deref(), Some(prompts::IMAGE_ONLY_PROMPT));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let gateway = GeminiGateway::new("http://localhost:9/v1beta/", "gemini-x", "key");
        assert_eq!(
            gateway.endpoint(),
            "http://localhost:9/v1beta/models/gemini-x:generateContent"
        );
    }
}
