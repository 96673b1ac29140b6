use std::path::PathBuf;
use thiserror::Error;

use crate::edit::PreconditionError;
use crate::validation::{ValidationError, ValidationReport};

/// The main error type for motfix operations.
#[derive(Debug, Error)]
pub enum MotfixError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON document from {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON document to {path}: {source}")]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML document from {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write YAML document to {path}: {source}")]
    YamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid dataset: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    #[error("Failed to read edit script {path}: {source}")]
    EditScript {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Audit failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Failed to render report: {0}")]
    ReportRender(#[source] serde_json::Error),

    #[error("Frame {frame} is outside the sequence (0..{total_frames})")]
    FrameOutOfRange { frame: u32, total_frames: u32 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
