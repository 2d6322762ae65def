//! Per-session context handed explicitly to the pipeline.
//!
//! A batch never reads credentials or timeouts from ambient state: the caller
//! builds a [`SessionContext`] once and passes it into every call.

use std::fmt;
use std::time::Duration;

use crate::error::{DocScanError, Result};

/// API credential for the inference endpoint. Opaque to the pipeline and
/// redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DocScanError::InvalidInput(
                "API credential must not be empty".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// How the inference call is issued.
///
/// The default is one attempt bounded by 30 seconds. A failed attempt is not
/// retried because the local recognizer already covers that case; raising
/// `max_attempts` re-issues the request only after transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub credential: Credential,
    pub policy: RequestPolicy,
}

impl SessionContext {
    pub fn new(credential: Credential, policy: RequestPolicy) -> Self {
        Self { credential, policy }
    }
}
