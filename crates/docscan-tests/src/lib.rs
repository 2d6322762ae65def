//! Shared fixtures for the integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docscan_core::error::{DocScanError, Result};
use docscan_core::{Credential, RequestPolicy, SessionContext, TextRecognizer};
use docscan_extraction::{ExtractionPipeline, OpenAiVisionClient};

/// Recognizer that returns the image bytes as text, so each image's fallback
/// text is known in advance. Bytes starting with `corrupt` fail recognition.
pub struct EchoRecognizer;

#[async_trait]
impl TextRecognizer for EchoRecognizer {
    fn name(&self) -> &str {
        "echo"
    }

    async fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        if image_bytes.starts_with(b"corrupt") {
            return Err(DocScanError::Recognition(
                "image could not be decoded".into(),
            ));
        }
        Ok(String::from_utf8_lossy(image_bytes).into_owned())
    }
}

pub fn session(timeout: Duration) -> SessionContext {
    SessionContext::new(
        Credential::new("sk-test").expect("non-empty credential"),
        RequestPolicy {
            timeout,
            max_attempts: 1,
        },
    )
}

/// Pipeline pointed at a mock chat-completions server.
pub fn pipeline(base_url: &str) -> ExtractionPipeline {
    ExtractionPipeline::new(
        Arc::new(OpenAiVisionClient::with_endpoint(base_url, "gpt-4o", 1000)),
        Arc::new(EchoRecognizer),
    )
}

/// Chat-completions response body carrying `content` as the reply.
pub fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    })
}
