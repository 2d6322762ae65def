use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::document::{document_type_counts, BatchResult, DegradationReason, ExtractionResult};

/// Result for one image plus the display name it came with.
///
/// On the wire the result carries an explicit `kind`, so a structured reply
/// that happens to hold only `error` and `ocr_text` reads back as structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OutcomeWire", into = "OutcomeWire")]
pub struct ImageOutcome {
    pub index: usize,
    pub name: String,
    pub result: ExtractionResult,
    /// Set when the local recognizer itself failed; `result` is then a
    /// degraded result with empty text.
    pub recognition_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Structured,
    Degraded,
}

#[derive(Serialize, Deserialize)]
struct OutcomeWire {
    index: usize,
    name: String,
    kind: ResultKind,
    result: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recognition_error: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DegradedFields {
    error: DegradationReason,
    ocr_text: String,
}

impl From<ImageOutcome> for OutcomeWire {
    fn from(outcome: ImageOutcome) -> Self {
        let (kind, result) = match outcome.result {
            ExtractionResult::Structured(fields) => (ResultKind::Structured, fields),
            ExtractionResult::Degraded { error, ocr_text } => {
                let mut fields = Map::new();
                fields.insert("error".into(), Value::from(error.as_str()));
                fields.insert("ocr_text".into(), Value::from(ocr_text));
                (ResultKind::Degraded, fields)
            }
        };
        Self {
            index: outcome.index,
            name: outcome.name,
            kind,
            result,
            recognition_error: outcome.recognition_error,
        }
    }
}

impl TryFrom<OutcomeWire> for ImageOutcome {
    type Error = serde_json::Error;

    fn try_from(wire: OutcomeWire) -> Result<Self, Self::Error> {
        let result = match wire.kind {
            ResultKind::Structured => ExtractionResult::Structured(wire.result),
            ResultKind::Degraded => {
                let fields: DegradedFields = serde_json::from_value(Value::Object(wire.result))?;
                ExtractionResult::degraded(fields.error, fields.ocr_text)
            }
        };
        Ok(Self {
            index: wire.index,
            name: wire.name,
            result,
            recognition_error: wire.recognition_error,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub processed_at: DateTime<Utc>,
    pub images: Vec<ImageOutcome>,
    pub document_types: BTreeMap<String, usize>,
    pub structured_count: usize,
    pub degraded_count: usize,
}

impl BatchReport {
    pub fn from_outcomes(images: Vec<ImageOutcome>) -> Self {
        let results: Vec<ExtractionResult> = images.iter().map(|o| o.result.clone()).collect();
        let structured_count = results.iter().filter(|r| r.is_structured()).count();
        Self {
            batch_id: Uuid::new_v4(),
            processed_at: Utc::now(),
            document_types: document_type_counts(&results),
            structured_count,
            degraded_count: results.len() - structured_count,
            images,
        }
    }

    /// The ordered per-image results.
    pub fn results(&self) -> BatchResult {
        self.images.iter().map(|o| o.result.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
