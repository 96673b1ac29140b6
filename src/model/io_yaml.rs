//! YAML reading and writing for dataset documents.
//!
//! YAML is parsed straight into a [`serde_json::Value`] so both formats go
//! through the same validation gate. Mappings with non-string keys fail to
//! parse.

use std::path::Path;

use serde_json::Value;

use super::dataset::DatasetDocument;
use crate::error::MotfixError;

/// Reads a YAML file into an untyped document.
pub fn read_yaml_value(path: &Path) -> Result<Value, MotfixError> {
    let yaml = std::fs::read_to_string(path)?;
    from_yaml_str(&yaml).map_err(|source| MotfixError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a document as YAML.
pub fn write_yaml(path: &Path, document: &DatasetDocument) -> Result<(), MotfixError> {
    let yaml = to_yaml_string(document).map_err(|source| MotfixError::YamlWrite {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Parses a YAML string into an untyped document.
pub fn from_yaml_str(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serializes a document to a YAML string.
pub fn to_yaml_string(document: &DatasetDocument) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
tracks:
  - id: T1
    label: Pedestrian
    color: '#EF4444'
detections:
  - id: T1_F3
    trackId: T1
    box: { x: 10, y: 20.5, w: 5, h: 15 }
    label: Pedestrian
    frame: 3
";

    #[test]
    fn test_yaml_parses_into_json_value() {
        let value = from_yaml_str(SAMPLE).expect("parse yaml");

        assert_eq!(value["tracks"][0]["color"], "#EF4444");
        assert_eq!(value["detections"][0]["frame"], 3);
        assert_eq!(value["detections"][0]["box"]["y"], 20.5);
    }

    #[test]
    fn test_yaml_output_uses_wire_names() {
        let value = from_yaml_str(SAMPLE).expect("parse yaml");
        let dataset = crate::validation::validate_document(&value).expect("valid");
        let yaml = to_yaml_string(&DatasetDocument::from_dataset(&dataset, 30)).expect("to yaml");

        assert!(yaml.contains("trackId: T1"));
        assert!(yaml.contains("totalFrames: 30"));
    }
}
