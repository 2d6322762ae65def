pub mod api_types;
pub mod config;
pub mod document;
pub mod error;
pub mod extraction;
pub mod report;
pub mod session;

pub use config::AppConfig;
pub use document::{
    document_type_counts, BatchResult, DegradationReason, DocumentField, ExtractionResult,
    InputImage,
};
pub use error::{DocScanError, Result};
pub use extraction::{TextRecognizer, VisionClient};
pub use report::{BatchReport, ImageOutcome, ResultKind};
pub use session::{Credential, RequestPolicy, SessionContext};
