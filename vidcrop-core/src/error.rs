use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for vidcrop
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Required external tool not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{cmd}': {source}")]
    CommandStart {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{cmd}' failed: {message}")]
    CommandFailed { cmd: String, message: String },

    #[error("Could not determine source resolution for {0}")]
    ProbeFailed(String),

    #[error("Invalid crop geometry for {path}: {width}x{height} after margins")]
    InvalidGeometry {
        path: String,
        width: i64,
        height: i64,
    },

    #[error("No video files found in input directory")]
    NoFilesFound,

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Ratings database not found at {}", .0.display())]
    DatabaseMissing(PathBuf),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Capture library error: {0}")]
    Capture(#[from] opencv::Error),
}

/// Result type for vidcrop operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a command that could not be spawned.
pub(crate) fn command_start_error(cmd: impl Into<String>, source: std::io::Error) -> CoreError {
    CoreError::CommandStart {
        cmd: cmd.into(),
        source,
    }
}

/// Builds a `CommandFailed` error carrying the tool's captured diagnostics.
pub(crate) fn command_failed_error(cmd: impl Into<String>, message: impl Into<String>) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        message: message.into(),
    }
}
