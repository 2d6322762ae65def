use serde::{Deserialize, Serialize};

use crate::document::BatchResult;
use crate::report::BatchReport;

// --- Health ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub ocr_language: String,
    pub credential_configured: bool,
}

// --- Extraction ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedImage {
    pub name: String,
    pub data_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub images: Vec<EncodedImage>,
    /// Overrides the configured credential for this batch only.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// `results` mirrors `report.images` and is rebuilt from it when read back.
#[derive(Debug, Serialize, Deserialize)]
#[serde(from = "BatchReport")]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub report: BatchReport,
    pub results: BatchResult,
}

impl From<BatchReport> for ExtractResponse {
    fn from(report: BatchReport) -> Self {
        let results = report.results();
        Self { report, results }
    }
}

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ExtractionResult;
    use crate::report::ImageOutcome;
    use serde_json::{json, Value};

    #[test]
    fn extract_response_keeps_error_shaped_structured_result() {
        let fields = match json!({"error": "transport failure", "ocr_text": "x"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let report = BatchReport::from_outcomes(vec![ImageOutcome {
            index: 0,
            name: "odd.jpg".into(),
            result: ExtractionResult::Structured(fields),
            recognition_error: None,
        }]);
        let response = ExtractResponse::from(report);

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["structured_count"], 1);

        let back: ExtractResponse = serde_json::from_value(body).unwrap();
        assert!(back.results[0].is_structured());
        assert_eq!(back.report.structured_count, 1);
        assert_eq!(back.results, response.results);
    }
}
