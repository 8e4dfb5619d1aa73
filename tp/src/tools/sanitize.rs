//! Model output cleanup
//!
//! Models wrap JSON in markdown fences or leak tool-use tags despite being
//! told not to. Only those known artifacts are stripped; anything else that
//! fails to parse is reported, never repaired.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Literal substrings removed from model output, applied in order
pub const ARTIFACTS: &[&str] = &["```json", "```", "<tool-use></tool-use>"];

/// Errors from [`sanitize_and_parse`]
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("Empty response received from model.")]
    Empty,

    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

/// Strip known formatting artifacts and surrounding whitespace
pub fn strip_artifacts(raw: &str) -> String {
    ARTIFACTS
        .iter()
        .fold(raw.to_string(), |text, artifact| text.replace(artifact, ""))
        .trim()
        .to_string()
}

/// Clean up raw model text and parse it as strict JSON
pub fn sanitize_and_parse(raw: &str) -> Result<Value, SanitizeError> {
    debug!(raw_len = raw.len(), "sanitize_and_parse: called");
    let cleaned = strip_artifacts(raw);
    if cleaned.is_empty() {
        debug!("sanitize_and_parse: nothing left after cleanup");
        return Err(SanitizeError::Empty);
    }
    Ok(serde_json::from_str(&cleaned)?)
}
