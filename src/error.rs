//! Error types for tasklist
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid config, validation failure)
//! - 3: Task not found
//! - 4: Operation failed (I/O, corrupt state, transport)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tasklist CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tasklist operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("title is required")]
    EmptyTitle,

    #[error("no fields provided for update")]
    NoUpdateFields,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Not found (exit code 3)
    #[error("task not found: {0}")]
    TaskNotFound(u64),

    // Operation failures (exit code 4)
    #[error("failed to parse {path}: {source}")]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("task state lock poisoned")]
    StatePoisoned,

    #[error("task ids exhausted")]
    IdsExhausted,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::EmptyTitle
            | Error::NoUpdateFields
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::TaskNotFound(_) => exit_codes::NOT_FOUND,

            // Errors relayed from the server keep the server's classification
            Error::Api { status, .. } => match *status {
                404 => exit_codes::NOT_FOUND,
                400..=499 => exit_codes::USER_ERROR,
                _ => exit_codes::OPERATION_FAILED,
            },

            // Operation failures
            Error::CorruptState { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::StatePoisoned
            | Error::IdsExhausted
            | Error::Http(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Whether this error means the addressed task does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::TaskNotFound(_) | Error::Api { status: 404, .. }
        )
    }

    /// Structured details for machine-readable output, when the variant has any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::Api { status, message } => Some(serde_json::json!({
                "status": status,
                "message": message,
            })),
            Error::InvalidConfig(message) | Error::InvalidArgument(message) => {
                Some(serde_json::json!({ "message": message }))
            }
            Error::CorruptState { path, .. } | Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for tasklist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
