use super::jpeg::jpeg_data_uri;
use super::openai_types::{
    ChatRequest, ChatResponse, ContentPart, ImageUrlContent, Message, MessageContent,
};
use super::prompt::{SYSTEM_PROMPT, schema_instruction};
use super::{PlantIdentifier, build_identify_client, sanitize_api_error};
use crate::config::Config;
use crate::core::result::PlantResult;
use crate::error::{DecodeError, IdentifyError};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;

/// Identifies plants through the OpenAI chat completions API.
pub struct OpenAiIdentifier {
    client: Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    jpeg_quality: u8,
}

impl OpenAiIdentifier {
    pub fn new(config: &Config) -> Self {
        Self {
            client: build_identify_client(config.request_timeout_secs),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            jpeg_quality: config.jpeg_quality,
        }
    }

    fn build_request(&self, data_uri: String) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
                },
                Message {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::ImageUrl {
                            image_url: ImageUrlContent { url: data_uri },
                        },
                        ContentPart::Text {
                            text: schema_instruction(),
                        },
                    ]),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Decode a chat completion body in two stages: the envelope, then the
    /// JSON document carried as a string in `choices[0].message.content`.
    pub fn decode_response(body: &str) -> Result<PlantResult, DecodeError> {
        let envelope: ChatResponse = serde_json::from_str(body).map_err(DecodeError::Envelope)?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(DecodeError::MissingContent)?;

        serde_json::from_str(&content).map_err(DecodeError::Content)
    }

    async fn send(&self, request: &ChatRequest, api_key: &str) -> Result<String, IdentifyError> {
        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .json(request)
            .send()
            .await
            .map_err(|e| IdentifyError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: sanitize_api_error(&e.to_string()),
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            return Err(IdentifyError::Transport {
                status: Some(status.as_u16()),
                message: sanitize_api_error(&body),
            });
        }

        response.text().await.map_err(|e| IdentifyError::Transport {
            status: Some(status.as_u16()),
            message: sanitize_api_error(&e.to_string()),
        })
    }
}

#[async_trait]
impl PlantIdentifier for OpenAiIdentifier {
    async fn identify(&self, image: &[u8], api_key: &str) -> Result<PlantResult, IdentifyError> {
        let data_uri = jpeg_data_uri(image, self.jpeg_quality)?;
        let request = self.build_request(data_uri);

        tracing::debug!(
            model = %self.model,
            image_bytes = image.len(),
            "sending identification request"
        );
        let body = self.send(&request, api_key).await?;
        let result = Self::decode_response(&body)?;
        tracing::debug!(
            common_name = %result.common_name,
            confidence = result.confidence,
            "identification decoded"
        );
        Ok(result)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
