//! Core tracking dataset model.
//!
//! A [`Dataset`] is the pair of collections every edit works on: tracks and
//! the detections bound to them. A [`DatasetDocument`] is the persisted form,
//! the same pair plus export metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::bbox::BoundingBox;
use super::ids::{DetectionId, TrackId};

/// Format version written into every exported document.
pub const DOCUMENT_VERSION: &str = "1.0";

/// A persistent object identity across frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier, conventionally `T<n>`.
    pub id: TrackId,

    /// Class name shared with every detection bound to this track.
    pub label: String,

    /// Display color, usually a palette entry such as `#EF4444`.
    pub color: String,
}

impl Track {
    /// Creates a new track with the given properties.
    pub fn new(
        id: impl Into<TrackId>,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}

/// One frame-localized observation belonging to exactly one track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// Unique identifier, stable across edits.
    pub id: DetectionId,

    /// Owning track. Must always resolve to a track in the same dataset.
    pub track_id: TrackId,

    /// Box in frame-percentage space.
    #[serde(rename = "box")]
    pub bbox: BoundingBox,

    /// Copy of the owning track's label.
    pub label: String,

    /// Zero-based frame index.
    pub frame: u32,
}

impl Detection {
    /// Creates a new detection.
    pub fn new(
        id: impl Into<DetectionId>,
        track_id: impl Into<TrackId>,
        bbox: BoundingBox,
        label: impl Into<String>,
        frame: u32,
    ) -> Self {
        Self {
            id: id.into(),
            track_id: track_id.into(),
            bbox,
            label: label.into(),
            frame,
        }
    }
}

/// Tracks plus the detections bound to them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub tracks: Vec<Track>,

    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl Dataset {
    /// Creates a dataset from its two collections.
    pub fn new(tracks: Vec<Track>, detections: Vec<Detection>) -> Self {
        Self { tracks, detections }
    }

    /// Looks up a track by id.
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id.as_str() == id)
    }

    /// Returns true if a track with this id exists.
    pub fn contains_track(&self, id: &str) -> bool {
        self.track(id).is_some()
    }

    /// Detections owned by the given track, in collection order.
    pub fn detections_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Detection> + 'a {
        self.detections
            .iter()
            .filter(move |d| d.track_id.as_str() == id)
    }

    /// Detections on the given frame, in collection order.
    pub fn detections_on_frame(&self, frame: u32) -> impl Iterator<Item = &Detection> + '_ {
        self.detections.iter().filter(move |d| d.frame == frame)
    }

    /// Detections whose `track_id` names no track in this dataset.
    pub fn dangling_detections(&self) -> Vec<&Detection> {
        let track_ids: HashSet<&str> = self.tracks.iter().map(|t| t.id.as_str()).collect();
        self.detections
            .iter()
            .filter(|d| !track_ids.contains(d.track_id.as_str()))
            .collect()
    }

    /// Returns true if every detection references an existing track.
    pub fn is_consistent(&self) -> bool {
        self.dangling_detections().is_empty()
    }
}

/// Export metadata attached to a persisted document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    /// RFC 3339 timestamp of the export.
    pub exported_at: String,

    /// Configured length of the frame sequence.
    pub total_frames: u32,

    /// Document format version, currently [`DOCUMENT_VERSION`].
    pub version: String,
}

/// The persisted/exchanged form of a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetDocument {
    pub tracks: Vec<Track>,
    pub detections: Vec<Detection>,
    pub metadata: DatasetMetadata,
}

impl DatasetDocument {
    /// Wraps a dataset with fresh export metadata.
    pub fn from_dataset(dataset: &Dataset, total_frames: u32) -> Self {
        Self {
            tracks: dataset.tracks.clone(),
            detections: dataset.detections.clone(),
            metadata: DatasetMetadata {
                exported_at: chrono::Utc::now().to_rfc3339(),
                total_frames,
                version: DOCUMENT_VERSION.to_string(),
            },
        }
    }
}
