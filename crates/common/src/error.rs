//! Error types for contract validation and model handling

use thiserror::Error;

/// Result type alias using the contract Error
pub type Result<T> = std::result::Result<T, Error>;

/// Contract and model errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Status code mismatch: expected {expected}, got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },

    #[error("Content type mismatch: expected {expected}, got {actual}")]
    ContentTypeMismatch { expected: String, actual: String },

    #[error("Response has no content type (expected {0})")]
    MissingContentType(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
}
