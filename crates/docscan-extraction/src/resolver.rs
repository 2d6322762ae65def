use std::sync::Arc;

use docscan_core::error::{DocScanError, Result};
use docscan_core::{DegradationReason, ExtractionResult, InputImage, TextRecognizer};

use crate::reply::parse_reply;

/// A resolved image: the result plus, if the local recognizer could not run,
/// why its text is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub result: ExtractionResult,
    pub recognition_error: Option<String>,
}

/// Turns a vision reply (or the failure to get one) into an
/// [`ExtractionResult`], falling back to local recognition when needed.
pub struct ResultResolver {
    recognizer: Arc<dyn TextRecognizer>,
}

impl ResultResolver {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { recognizer }
    }

    pub async fn resolve(&self, reply: Result<String>, image: &InputImage) -> Resolution {
        let parsed = reply.and_then(|raw| parse_reply(&raw).map_err(DocScanError::from));

        let err = match parsed {
            Ok(fields) => {
                tracing::info!(
                    image = %image.name,
                    fields = fields.len(),
                    "Parsed structured reply"
                );
                return Resolution {
                    result: ExtractionResult::Structured(fields),
                    recognition_error: None,
                };
            }
            Err(e) => e,
        };

        let reason = if err.is_transport() {
            DegradationReason::TransportFailure
        } else {
            DegradationReason::MalformedReply
        };
        tracing::warn!(
            image = %image.name,
            error = %err,
            reason = %reason,
            "Structured extraction unavailable, falling back to local recognition"
        );

        self.fallback(reason, image).await
    }

    async fn fallback(&self, reason: DegradationReason, image: &InputImage) -> Resolution {
        match self.recognizer.recognize(&image.bytes).await {
            Ok(text) => {
                tracing::info!(
                    image = %image.name,
                    recognizer = self.recognizer.name(),
                    text_len = text.len(),
                    reason = %reason,
                    "Local recognition complete"
                );
                Resolution {
                    result: ExtractionResult::degraded(reason, text),
                    recognition_error: None,
                }
            }
            Err(e) => {
                tracing::error!(
                    image = %image.name,
                    recognizer = self.recognizer.name(),
                    error = %e,
                    "Local recognition failed"
                );
                Resolution {
                    result: ExtractionResult::degraded(reason, String::new()),
                    recognition_error: Some(e.to_string()),
                }
            }
        }
    }
}
