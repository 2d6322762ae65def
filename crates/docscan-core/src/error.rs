use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocScanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inference endpoint returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Inference request timed out after {0}s")]
    Timeout(u64),

    #[error("Inference response carried no reply text")]
    EmptyReply,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed structured reply: {0}")]
    MalformedReply(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocScanError {
    /// Whether the inference call itself failed, as opposed to its reply
    /// being unusable or the local recognizer failing.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DocScanError::Http(_)
                | DocScanError::Json(_)
                | DocScanError::UpstreamStatus { .. }
                | DocScanError::Timeout(_)
                | DocScanError::EmptyReply
                | DocScanError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DocScanError>;
