//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Stub server failed to start: {0}")]
    StubStartup(String),

    #[error("Stub health check failed after {0} attempts")]
    StubHealthCheck(usize),

    #[error("Contract violation: {0}")]
    Contract(#[from] reqres_common::Error),

    #[error("Field mismatch on '{field}': expected {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
