//! Dataset validation for motfix.
//!
//! Two entry points with different jobs:
//! - [`validate_document`] is the import gate. It turns an untyped document
//!   into a [`Dataset`] or stops at the first problem, so a bad file never
//!   replaces the state being edited.
//! - [`audit_dataset`] inspects an already-typed dataset and collects every
//!   issue, including warnings the gate does not care about.

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{BoundingBox, Dataset, Detection, Track};

/// The first problem found in an import document.
#[derive(Clone, Debug, Error)]
#[error("{context}: {message}")]
pub struct ValidationError {
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl ValidationError {
    fn new(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            code,
            message: message.into(),
            context,
        }
    }
}

/// Checks an untyped document and returns the typed dataset it describes.
///
/// Checks run in order and stop at the first failure:
/// 1. the document is an object
/// 2. `tracks` and `detections` are arrays (absent or `null` means empty)
/// 3. every track has non-empty `id`, `label` and `color`
/// 4. every detection has non-empty `id`, `trackId` and `label`, an integer
///    `frame` and a numeric `box`
/// 5. ids are unique and every `trackId` names a loaded track
pub fn validate_document(document: &Value) -> Result<Dataset, ValidationError> {
    let object = document.as_object().ok_or_else(|| {
        ValidationError::new(
            IssueCode::NotAnObject,
            "Expected a JSON object with 'tracks' and 'detections'",
            IssueContext::Document,
        )
    })?;

    let track_values = entries(object, "tracks")?;
    let detection_values = entries(object, "detections")?;

    let tracks = track_values
        .iter()
        .enumerate()
        .map(|(index, value)| parse_track(index, value))
        .collect::<Result<Vec<_>, _>>()?;
    let detections = detection_values
        .iter()
        .enumerate()
        .map(|(index, value)| parse_detection(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let dataset = Dataset::new(tracks, detections);
    check_integrity(&dataset)?;
    Ok(dataset)
}

fn entries<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], ValidationError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(values)) => Ok(values.as_slice()),
        Some(_) => Err(ValidationError::new(
            IssueCode::NotAnArray,
            format!("'{}' must be an array", key),
            IssueContext::Document,
        )),
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn parse_track(index: usize, value: &Value) -> Result<Track, ValidationError> {
    let context = || IssueContext::TrackAt { index };
    let object = value.as_object().ok_or_else(|| {
        ValidationError::new(IssueCode::InvalidTrack, "Track must be an object", context())
    })?;

    let field = |key: &str| {
        non_empty_str(object, key).ok_or_else(|| {
            ValidationError::new(
                IssueCode::InvalidTrack,
                format!("Missing or empty '{}'", key),
                context(),
            )
        })
    };

    Ok(Track::new(field("id")?, field("label")?, field("color")?))
}

fn parse_detection(index: usize, value: &Value) -> Result<Detection, ValidationError> {
    let context = || IssueContext::DetectionAt { index };
    let object = value.as_object().ok_or_else(|| {
        ValidationError::new(
            IssueCode::InvalidDetection,
            "Detection must be an object",
            context(),
        )
    })?;

    let field = |key: &str| {
        non_empty_str(object, key).ok_or_else(|| {
            ValidationError::new(
                IssueCode::InvalidDetection,
                format!("Missing or empty '{}'", key),
                context(),
            )
        })
    };
    let id = field("id")?;
    let track_id = field("trackId")?;
    let label = field("label")?;

    let frame = object
        .get("frame")
        .and_then(Value::as_f64)
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
        .ok_or_else(|| {
            ValidationError::new(
                IssueCode::InvalidFrame,
                "'frame' must be a non-negative integer",
                context(),
            )
        })? as u32;

    let bbox = object
        .get("box")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ValidationError::new(IssueCode::InvalidBox, "Missing 'box' object", context())
        })?;
    let coord = |key: &str| {
        bbox.get(key).and_then(Value::as_f64).ok_or_else(|| {
            ValidationError::new(
                IssueCode::InvalidBox,
                format!("Box field '{}' must be numeric", key),
                context(),
            )
        })
    };
    let bbox = BoundingBox::new(coord("x")?, coord("y")?, coord("w")?, coord("h")?);

    Ok(Detection::new(id, track_id, bbox, label, frame))
}

/// Rejects duplicate ids, track ids whose number does not fit in `u64`,
/// detections bound to a missing track and non-finite boxes.
pub fn check_integrity(dataset: &Dataset) -> Result<(), ValidationError> {
    let mut track_ids = HashSet::new();
    for track in &dataset.tracks {
        if track.id.has_oversized_suffix() {
            return Err(ValidationError::new(
                IssueCode::InvalidTrack,
                "Numeric part of the ID does not fit in 64 bits",
                IssueContext::Track {
                    id: track.id.to_string(),
                },
            ));
        }
        if !track_ids.insert(track.id.as_str()) {
            return Err(ValidationError::new(
                IssueCode::DuplicateTrackId,
                format!("Duplicate track ID {}", track.id),
                IssueContext::Track {
                    id: track.id.to_string(),
                },
            ));
        }
    }

    let mut detection_ids = HashSet::new();
    for detection in &dataset.detections {
        let context = || IssueContext::Detection {
            id: detection.id.to_string(),
        };
        if !detection_ids.insert(detection.id.as_str()) {
            return Err(ValidationError::new(
                IssueCode::DuplicateDetectionId,
                format!("Duplicate detection ID {}", detection.id),
                context(),
            ));
        }
        if !track_ids.contains(detection.track_id.as_str()) {
            return Err(ValidationError::new(
                IssueCode::MissingTrackRef,
                format!("References non-existent track {}", detection.track_id),
                context(),
            ));
        }
        if !detection.bbox.is_finite() {
            return Err(ValidationError::new(
                IssueCode::BoxNotFinite,
                "Box fields must be finite",
                context(),
            ));
        }
    }

    Ok(())
}

/// Options for audit behavior.
#[derive(Clone, Debug, Default)]
pub struct AuditOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,

    /// Frame count to check detection frames against, if known.
    pub total_frames: Option<u32>,
}

/// Audits a dataset and returns a report of all issues found.
///
/// Errors: empty fields, duplicate ids, dangling track references,
/// non-finite boxes.
/// Warnings: labels out of sync with their track, several detections of one
/// track on one frame, tracks without detections, boxes outside the frame,
/// frames beyond `total_frames`.
pub fn audit_dataset(dataset: &Dataset, opts: &AuditOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    let track_labels = audit_tracks(dataset, &mut report);
    audit_detections(dataset, &track_labels, opts, &mut report);

    report
}

/// Audits the track list and returns a label lookup for the detection pass.
fn audit_tracks<'a>(dataset: &'a Dataset, report: &mut ValidationReport) -> HashMap<&'a str, &'a str> {
    let mut labels: HashMap<&str, &str> = HashMap::new();
    let owned: HashSet<&str> = dataset
        .detections
        .iter()
        .map(|d| d.track_id.as_str())
        .collect();

    for track in &dataset.tracks {
        let id = track.id.as_str();
        let context = || IssueContext::Track { id: id.to_string() };

        let fields = [
            ("id", id),
            ("label", track.label.as_str()),
            ("color", track.color.as_str()),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                report.add(ValidationIssue::error(
                    IssueCode::InvalidTrack,
                    format!("Empty '{}'", field),
                    context(),
                ));
            }
        }

        if labels.insert(id, track.label.as_str()).is_some() {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateTrackId,
                format!("Duplicate track ID {}", id),
                context(),
            ));
        }

        if !owned.contains(id) {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyTrack,
                "Track has no detections",
                context(),
            ));
        }
    }

    labels
}

fn audit_detections(
    dataset: &Dataset,
    track_labels: &HashMap<&str, &str>,
    opts: &AuditOptions,
    report: &mut ValidationReport,
) {
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut seen_frames: HashMap<(&str, u32), &str> = HashMap::new();

    for detection in &dataset.detections {
        let id = detection.id.as_str();
        let context = || IssueContext::Detection { id: id.to_string() };

        if id.is_empty() || detection.label.is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::InvalidDetection,
                "Empty 'id' or 'label'",
                context(),
            ));
        }

        if !seen_ids.insert(id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateDetectionId,
                format!("Duplicate detection ID {}", id),
                context(),
            ));
        }

        match track_labels.get(detection.track_id.as_str()) {
            None => report.add(ValidationIssue::error(
                IssueCode::MissingTrackRef,
                format!("References non-existent track {}", detection.track_id),
                context(),
            )),
            Some(label) if *label != detection.label => report.add(ValidationIssue::warning(
                IssueCode::LabelOutOfSync,
                format!(
                    "Label '{}' differs from track {} label '{}'",
                    detection.label, detection.track_id, label
                ),
                context(),
            )),
            Some(_) => {}
        }

        if let Some(first) = seen_frames.insert((detection.track_id.as_str(), detection.frame), id) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateTrackFrame,
                format!(
                    "Track {} already has detection {} on frame {}",
                    detection.track_id, first, detection.frame
                ),
                context(),
            ));
        }

        if let Some(total) = opts.total_frames {
            if detection.frame >= total {
                report.add(ValidationIssue::warning(
                    IssueCode::FrameOutOfRange,
                    format!("Frame {} is beyond the last frame {}", detection.frame, total.saturating_sub(1)),
                    context(),
                ));
            }
        }

        let bbox = &detection.bbox;
        if !bbox.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::BoxNotFinite,
                format!(
                    "Non-finite box ({}, {}, {}, {})",
                    bbox.x, bbox.y, bbox.w, bbox.h
                ),
                context(),
            ));
            continue;
        }

        if !bbox.is_within_frame() {
            report.add(ValidationIssue::warning(
                IssueCode::BoxOutsideFrame,
                format!(
                    "Box ({:.1}, {:.1}, {:.1}, {:.1}) extends outside the frame",
                    bbox.x, bbox.y, bbox.w, bbox.h
                ),
                context(),
            ));
        }
    }
}
