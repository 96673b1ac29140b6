//! JSON reading and writing for dataset documents.
//!
//! Reading stops at an untyped [`serde_json::Value`]: the typed dataset only
//! comes out of [`crate::validation::validate_document`], so a document that
//! parses but has the wrong shape still gets a field-level message.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde_json::Value;

use super::dataset::DatasetDocument;
use crate::error::MotfixError;

/// Reads a JSON file into an untyped document.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid JSON.
pub fn read_json_value(path: &Path) -> Result<Value, MotfixError> {
    let file = File::open(path).map_err(MotfixError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| MotfixError::DocumentParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a document as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_json(path: &Path, document: &DatasetDocument) -> Result<(), MotfixError> {
    let file = File::create(path).map_err(MotfixError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(|source| MotfixError::DocumentWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a JSON string into an untyped document.
pub fn from_json_str(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses JSON bytes into an untyped document.
pub fn from_json_slice(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serializes a document to a pretty-printed JSON string.
pub fn to_json_string(document: &DatasetDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Dataset, Detection, Track};

    fn sample_document() -> DatasetDocument {
        let dataset = Dataset::new(
            vec![Track::new("T1", "Pedestrian", "#EF4444")],
            vec![Detection::new(
                "T1_F0",
                "T1",
                BoundingBox::new(10.0, 20.0, 5.0, 15.0),
                "Pedestrian",
                0,
            )],
        );
        DatasetDocument::from_dataset(&dataset, 30)
    }

    #[test]
    fn test_json_format() {
        let json = to_json_string(&sample_document()).expect("serialization failed");

        assert!(json.contains("\"tracks\""));
        assert!(json.contains("\"detections\""));
        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"version\": \"1.0\""));
    }

    #[test]
    fn test_json_value_keeps_shape() {
        let json = to_json_string(&sample_document()).expect("serialization failed");
        let value = from_json_str(&json).expect("parse failed");

        assert_eq!(value["tracks"][0]["id"], "T1");
        assert_eq!(value["detections"][0]["trackId"], "T1");
        assert_eq!(value["detections"][0]["box"]["h"], 15.0);
        assert_eq!(value["metadata"]["totalFrames"], 30);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dataset.json");
        let document = sample_document();

        write_json(&path, &document).expect("write failed");
        let value = read_json_value(&path).expect("read failed");
        let restored: DatasetDocument = serde_json::from_value(value).expect("typed parse");

        assert_eq!(restored, document);
    }

    #[test]
    fn test_not_json_is_parse_error() {
        assert!(from_json_slice(b"{ not json").is_err());
    }
}
