use std::sync::Arc;

use docscan_core::error::{DocScanError, Result};
use docscan_core::{AppConfig, Credential, SessionContext};
use docscan_extraction::{ExtractionPipeline, OpenAiVisionClient};
use docscan_ocr::TesseractRecognizer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<ExtractionPipeline>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let vision = Arc::new(OpenAiVisionClient::new(&config));
        let recognizer = Arc::new(TesseractRecognizer::from_config(&config));
        Self::with_pipeline(config, ExtractionPipeline::new(vision, recognizer))
    }

    pub fn with_pipeline(config: AppConfig, pipeline: ExtractionPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }

    /// Session for one batch. A non-empty key supplied with the request wins
    /// over the configured one.
    pub fn session(&self, api_key: Option<&str>) -> Result<SessionContext> {
        let key = match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => key,
            None if self.config.has_credential() => self.config.openai_api_key.as_str(),
            None => {
                return Err(DocScanError::InvalidInput(
                    "no API credential configured; set OPENAI_API_KEY or send api_key".into(),
                ))
            }
        };
        Ok(SessionContext::new(
            Credential::new(key)?,
            self.config.request_policy(),
        ))
    }
}
