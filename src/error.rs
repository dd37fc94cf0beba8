//! Error types for taskgrid
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, missing config, unknown task)
//! - 3: Blocked (not signed in, token rejected, stale row guard)
//! - 4: Operation failed (transport, API, local IO)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskgrid CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskgrid operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Ambiguous task id '{input}': matches {}", candidates.join(", "))]
    AmbiguousTask {
        input: String,
        candidates: Vec<String>,
    },

    // Blocked (exit code 3)
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Access token rejected: {0}")]
    Unauthorized(String),

    #[error("Row {row} no longer holds task {id} (found '{found}')")]
    StaleRow { id: String, row: u32, found: String },

    // Operation failures (exit code 4)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::ConfigNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::TaskNotFound(_)
            | Error::AmbiguousTask { .. } => exit_codes::USER_ERROR,

            // Blocked
            Error::NotSignedIn | Error::Unauthorized(_) | Error::StaleRow { .. } => {
                exit_codes::BLOCKED
            }

            // Operation failures
            Error::Http(_)
            | Error::Api { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for taskgrid operations
pub type Result<T> = std::result::Result<T, Error>;
