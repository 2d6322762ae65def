use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use docscan_core::config::AppConfig;
use docscan_core::error::{DocScanError, Result};
use docscan_core::extraction::VisionClient;
use docscan_core::{InputImage, SessionContext};

use crate::prompt::{extraction_instruction, image_data_uri};

/// Vision client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiVisionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

// ── Chat completions request/response types ────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

// ── Implementation ─────────────────────────────────────────────────────────

impl OpenAiVisionClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_endpoint(
            &config.openai_base_url,
            &config.vision_model,
            config.vision_max_tokens,
        )
    }

    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn with_endpoint(base_url: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            max_tokens,
        }
    }

    fn build_request(&self, image: &InputImage) -> ChatRequest {
        let image_b64 = STANDARD.encode(&image.bytes);
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: extraction_instruction(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_uri(&image_b64),
                        },
                    },
                ],
            }],
        }
    }

    async fn call_once(&self, request: &ChatRequest, session: &SessionContext) -> Result<String> {
        let timeout = session.policy.timeout;
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(session.credential.expose())
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DocScanError::Timeout(timeout.as_secs())
                } else {
                    DocScanError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(DocScanError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                DocScanError::Timeout(timeout.as_secs())
            } else {
                DocScanError::Http(e)
            }
        })?;
        let chat: ChatResponse = serde_json::from_slice(&body)?;

        let choice = chat.choices.into_iter().next().ok_or(DocScanError::EmptyReply)?;
        tracing::debug!(finish_reason = ?choice.finish_reason, "Received vision reply");
        choice.message.content.ok_or(DocScanError::EmptyReply)
    }
}

#[async_trait]
impl VisionClient for OpenAiVisionClient {
    async fn extract(&self, image: &InputImage, session: &SessionContext) -> Result<String> {
        if image.bytes.is_empty() {
            return Err(DocScanError::InvalidInput(format!(
                "image '{}' is empty",
                image.name
            )));
        }

        let request = self.build_request(image);
        let attempts = session.policy.max_attempts.max(1);

        tracing::debug!(
            model = %self.model,
            image = %image.name,
            image_bytes = image.bytes.len(),
            timeout_secs = session.policy.timeout.as_secs(),
            "Sending extraction request to vision endpoint"
        );

        let mut attempt = 1;
        loop {
            match self.call_once(&request, session).await {
                Ok(reply) => {
                    tracing::debug!(
                        image = %image.name,
                        reply_len = reply.len(),
                        "Vision endpoint replied"
                    );
                    return Ok(reply);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        image = %image.name,
                        attempt,
                        error = %e,
                        "Vision request failed, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
