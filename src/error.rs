//! Error types for gemsync operations.
//!
//! This module defines [`GemsyncError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is terminal for the current action; nothing is retried
//! - Process failures carry the captured tool output
//! - Use `anyhow::Error` (via `GemsyncError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gemsync operations.
#[derive(Debug, Error)]
pub enum GemsyncError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The configured bundle path does not exist.
    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// No Gemfile was found searching upward from `start`.
    #[error("No Gemfile found in {start} or any parent directory")]
    ManifestNotFound { start: PathBuf },

    /// `gem environment` output did not contain an executable directory.
    #[error("Could not find EXECUTABLE DIRECTORY in `{} environment` output:\n{output}", gem_binary.display())]
    ToolEnvironmentParse { gem_binary: PathBuf, output: String },

    /// An external command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}\n---- stdout ----\n{stdout}\n---- stderr ----\n{stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Installing or upgrading a tool package failed.
    #[error("Failed to install package '{package}': {message}")]
    BootstrapFailed { package: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for gemsync operations.
pub type Result<T> = std::result::Result<T, GemsyncError>;
