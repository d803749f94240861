//! Error types and exit codes for ezproxy-config-lint
//!
//! Lint findings are not errors: they are [`Diagnostic`](crate::linter::Diagnostic)
//! values returned line by line. The variants here are the hard failures that
//! abort a run, such as an unreadable config file or an IncludeFile that
//! cannot be resolved.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for ezproxy-config-lint operations
#[derive(Error, Debug)]
pub enum LintError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to find IncludeFile path on line {line:?}")]
    MissingIncludePath { line: String },

    #[error("Error encountered when processing line {line:?} (resolved to {path}): {source}")]
    IncludeFailed {
        line: String,
        path: PathBuf,
        #[source]
        source: Box<LintError>,
    },

    #[error("IncludeFile nesting deeper than {depth} levels at {path}")]
    IncludeDepthExceeded { path: PathBuf, depth: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl LintError {
    /// Convert error to the process exit code:
    /// - 1: File not found / IO error (including failed includes)
    /// - 3: Configuration error
    /// - 4: IncludeFile depth guard tripped
    ///
    /// Exit code 2 is reserved for a successful run that emitted diagnostics.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// The raw status byte behind [`exit_code`](Self::exit_code).
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::FileNotFound { .. } => 1,
            Self::Io { .. } => 1,
            Self::MissingIncludePath { .. } => 1,
            Self::IncludeFailed { source, .. } => source.exit_status(),
            Self::IncludeDepthExceeded { .. } => 4,
            Self::ConfigError { .. } => 3,
            Self::Json(_) => 1,
            Self::Output(_) => 1,
        }
    }
}

/// Result type alias for ezproxy-config-lint operations
pub type Result<T> = std::result::Result<T, LintError>;
