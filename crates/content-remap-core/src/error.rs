//! Error types for reference remapping.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemapError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid input shape at {path}: expected {expected}, found {found}")]
    InvalidShape {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded { path: String, max_depth: usize },

    #[error("Story {index} could not be remapped: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<RemapError>,
    },
}

impl RemapError {
    /// Build an [`RemapError::InvalidShape`] describing the JSON kind that was found.
    pub(crate) fn invalid_shape(path: &str, expected: &str, found: &serde_json::Value) -> Self {
        Self::InvalidShape {
            path: path.to_string(),
            expected: expected.to_string(),
            found: json_kind(found).to_string(),
        }
    }
}

/// Human-readable JSON kind, used in shape errors.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
