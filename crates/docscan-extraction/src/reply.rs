//! Parsing of the model's semi-structured reply.
//!
//! The model is told to answer with a single ```json fenced block, but
//! replies routinely add prose around it or drop the fence. Parsing tries
//! the fenced block first and then falls back to the widest `{ … }` span.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use docscan_core::DocScanError;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[ \t]*(?:json|JSON)?[ \t]*\r?\n?(.*?)```").expect("valid fence regex")
});

// Greedy: first `{` through last `}`.
static BRACE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid brace regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    /// Nothing in the reply looks like a JSON object.
    #[error("no JSON object found in reply")]
    NoJsonObject,
    /// A candidate was found but did not parse.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// The candidate parsed to something other than an object.
    #[error("JSON value is not an object")]
    NotAnObject,
}

impl From<ReplyError> for DocScanError {
    fn from(err: ReplyError) -> Self {
        DocScanError::MalformedReply(err.to_string())
    }
}

/// Content of the first fenced code block, if the reply has one.
pub fn fenced_block(reply: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Widest `{ … }` span in the reply.
pub fn brace_span(reply: &str) -> Option<&str> {
    BRACE_SPAN.find(reply).map(|m| m.as_str())
}

fn parse_object(candidate: &str) -> Result<Map<String, Value>, ReplyError> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ReplyError::NotAnObject),
        Err(e) => Err(ReplyError::InvalidJson(e.to_string())),
    }
}

/// Extract the structured object from a reply.
pub fn parse_reply(reply: &str) -> Result<Map<String, Value>, ReplyError> {
    let fenced_err = match fenced_block(reply) {
        Some(block) => match parse_object(block) {
            Ok(map) => return Ok(map),
            Err(e) => {
                tracing::debug!(error = %e, "Fenced block did not parse, scanning for braces");
                Some(e)
            }
        },
        None => None,
    };

    match brace_span(reply) {
        Some(span) => parse_object(span),
        None => Err(fenced_err.unwrap_or(ReplyError::NoJsonObject)),
    }
}
