use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One uploaded picture: raw bytes plus the name it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputImage {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Field vocabulary the model is asked to report. The keys are the labels
/// used in the prompt, so a structured reply uses them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentField {
    DocumentType,
    Name,
    BirthDate,
    DocumentNumber,
    Cpf,
    IssuingAuthority,
    LicenseCategory,
    MotherName,
    FatherName,
}

impl DocumentField {
    pub const ALL: [DocumentField; 9] = [
        DocumentField::DocumentType,
        DocumentField::Name,
        DocumentField::BirthDate,
        DocumentField::DocumentNumber,
        DocumentField::Cpf,
        DocumentField::IssuingAuthority,
        DocumentField::LicenseCategory,
        DocumentField::MotherName,
        DocumentField::FatherName,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DocumentField::DocumentType => "Tipo de Documento",
            DocumentField::Name => "Nome",
            DocumentField::BirthDate => "Data de Nascimento",
            DocumentField::DocumentNumber => "Número do documento",
            DocumentField::Cpf => "CPF",
            DocumentField::IssuingAuthority => "Órgão emissor",
            DocumentField::LicenseCategory => "Categoria",
            DocumentField::MotherName => "Nome da mãe",
            DocumentField::FatherName => "Nome do pai",
        }
    }
}

/// Why the structured path was abandoned for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegradationReason {
    #[serde(rename = "transport failure")]
    TransportFailure,
    #[serde(rename = "malformed structured reply")]
    MalformedReply,
}

impl DegradationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DegradationReason::TransportFailure => "transport failure",
            DegradationReason::MalformedReply => "malformed structured reply",
        }
    }
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of extracting a single image.
///
/// `Structured` holds the model's JSON object exactly as parsed. `Degraded`
/// serializes to exactly two keys: `error` and `ocr_text`. Read back on its
/// own, a structured object with exactly those two keys is taken as
/// `Degraded`; [`crate::ImageOutcome`] carries the kind alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Degraded {
        error: DegradationReason,
        ocr_text: String,
    },
    Structured(Map<String, Value>),
}

impl ExtractionResult {
    pub fn degraded(reason: DegradationReason, ocr_text: impl Into<String>) -> Self {
        ExtractionResult::Degraded {
            error: reason,
            ocr_text: ocr_text.into(),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ExtractionResult::Structured(_))
    }

    pub fn degradation(&self) -> Option<DegradationReason> {
        match self {
            ExtractionResult::Degraded { error, .. } => Some(*error),
            ExtractionResult::Structured(_) => None,
        }
    }

    /// String value of a structured field. Non-string JSON values are not
    /// coerced and read as absent here.
    pub fn field(&self, field: DocumentField) -> Option<&str> {
        match self {
            ExtractionResult::Structured(fields) => {
                fields.get(field.key()).and_then(Value::as_str)
            }
            ExtractionResult::Degraded { .. } => None,
        }
    }

    pub fn document_type(&self) -> Option<&str> {
        self.field(DocumentField::DocumentType)
    }
}

/// Ordered results, one per input image.
pub type BatchResult = Vec<ExtractionResult>;

/// Count structured results per reported document type. Degraded results and
/// structured results without a document type are skipped.
pub fn document_type_counts(results: &[ExtractionResult]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for doc_type in results.iter().filter_map(ExtractionResult::document_type) {
        *counts.entry(doc_type.to_string()).or_insert(0) += 1;
    }
    counts
}
