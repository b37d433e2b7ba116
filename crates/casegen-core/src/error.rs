//! Error taxonomy for pipeline runs.
//!
//! Every variant is fatal: the orchestrator never retries and never resumes.
//! Collaborator failures are carried through untouched.

use std::path::PathBuf;

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no {prefix}* file found in {}. Run extraction first.", .dir.display())]
    NotFound { dir: PathBuf, prefix: String },

    #[error("no testable requirements found in {artifact}")]
    EmptyResult { artifact: String },

    #[error("storage error at {}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize artifact")]
    Serialization(#[from] serde_json::Error),

    #[error("spreadsheet export failed for {}", .path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Collaborator(anyhow::Error),
}

impl PipelineError {
    /// Wrap an I/O failure with the path it happened at.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Wrap a workbook failure with the path it was bound for.
    pub fn spreadsheet(path: impl Into<PathBuf>, source: rust_xlsxwriter::XlsxError) -> Self {
        Self::Spreadsheet {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error class. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NotFound { .. } => 2,
            Self::EmptyResult { .. } => 3,
            Self::Storage { .. } | Self::Serialization(_) | Self::Spreadsheet { .. } => 4,
            Self::Collaborator(_) => 5,
            Self::Config(_) => 64,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
