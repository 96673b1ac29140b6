//! Data model for tracking annotation datasets.
//!
//! Tracks carry an identity, a class label and a display color. Detections
//! are per-frame boxes bound to a track by its id and carry a copy of the
//! track's label.
//!
//! # Example
//!
//! ```
//! use motfix::model::{BoundingBox, Dataset, Detection, Track};
//!
//! let dataset = Dataset::new(
//!     vec![Track::new("T1", "Pedestrian", "#EF4444")],
//!     vec![Detection::new(
//!         "T1_F0",
//!         "T1",
//!         BoundingBox::new(10.0, 20.0, 5.0, 15.0),
//!         "Pedestrian",
//!         0,
//!     )],
//! );
//! assert!(dataset.is_consistent());
//! ```

mod bbox;
mod dataset;
mod ids;
pub mod io_json;
pub mod io_yaml;

pub use bbox::BoundingBox;
pub use dataset::{
    Dataset, DatasetDocument, DatasetMetadata, Detection, Track, DOCUMENT_VERSION,
};
pub use ids::{DetectionId, TrackId};

use std::path::Path;

use serde_json::Value;

use crate::error::MotfixError;

/// On-disk encoding of a dataset document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Parses a user-facing format name.
    pub fn from_name(name: &str) -> Result<Self, MotfixError> {
        match name {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            other => Err(MotfixError::UnsupportedFormat(format!(
                "'{}' (supported: json, yaml)",
                other
            ))),
        }
    }

    /// Picks the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }

    /// Resolves an optional explicit name against the path's extension.
    pub fn resolve(name: Option<&str>, path: &Path) -> Result<Self, MotfixError> {
        match name {
            Some(name) => Self::from_name(name),
            None => Ok(Self::from_path(path)),
        }
    }
}

/// Reads a document file in the given format into an untyped value.
pub fn read_document_value(path: &Path, format: DocumentFormat) -> Result<Value, MotfixError> {
    match format {
        DocumentFormat::Json => io_json::read_json_value(path),
        DocumentFormat::Yaml => io_yaml::read_yaml_value(path),
    }
}

/// Writes a document file in the given format.
pub fn write_document(
    path: &Path,
    document: &DatasetDocument,
    format: DocumentFormat,
) -> Result<(), MotfixError> {
    match format {
        DocumentFormat::Json => io_json::write_json(path, document),
        DocumentFormat::Yaml => io_yaml::write_yaml(path, document),
    }
}
