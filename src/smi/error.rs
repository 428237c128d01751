// ABOUTME: Error types for nvidia-smi queries and field access
// ABOUTME: One error enum shared by the tree, the views and the query runner

use thiserror::Error;

/// Result type alias using SmiError
pub type Result<T> = std::result::Result<T, SmiError>;

/// Main error type for querying and reading nvidia-smi reports
#[derive(Error, Debug)]
pub enum SmiError {
    /// Field path matched no node, or a node without text
    #[error("{context} field '{path}' not found")]
    FieldNotFound { context: &'static str, path: String },

    /// Field text does not have the shape its accessor expects
    #[error("Malformed value '{value}' at '{path}': {reason}")]
    MalformedValue {
        path: String,
        value: String,
        reason: String,
    },

    /// Device ordinal outside `[0, count)`
    #[error("GPU index {index} out of range [0, {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// The external tool ran but reported failure or produced nothing
    #[error("{program} with arguments {args:?} failed (exit code {code:?}): {details}")]
    ExternalToolFailure {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
        details: String,
    },

    /// The external tool could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Raw output is not a well-formed XML document
    #[error("Malformed XML document at byte {position}: {message}")]
    MalformedDocument { position: u64, message: String },

    /// Tree access on a snapshot that was kept as raw text only
    #[error("Snapshot holds raw text only; no parsed document")]
    NotParsed,
}

impl SmiError {
    pub fn field_not_found(context: &'static str, path: impl Into<String>) -> Self {
        Self::FieldNotFound {
            context,
            path: path.into(),
        }
    }

    pub fn malformed_value(
        path: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::MalformedValue {
            path: path.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_document(position: u64, message: impl ToString) -> Self {
        Self::MalformedDocument {
            position,
            message: message.to_string(),
        }
    }
}
