//! Track editing operations.
//!
//! Merge, split and relabel are pure functions from a [`Dataset`] to a new
//! one: they either return the complete rewritten collections or a
//! [`PreconditionError`], never a half-applied change. The store commits the
//! result in one assignment.
//!
//! [`Dataset`]: crate::model::Dataset

mod selection;
mod suggest;
mod transform;

pub use selection::Selection;
pub use suggest::{suggest_labels, MAX_SUGGESTIONS};
pub use transform::{merge_tracks, relabel_track, split_track, MergeOutcome, SplitOutcome};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TrackId;

/// An edit that was refused because its inputs do not allow it.
///
/// Nothing is changed when one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Please select at least two tracks to merge ({selected} selected)")]
    NotEnoughTracksToMerge { selected: usize },

    #[error("Please select exactly one track to split ({selected} selected)")]
    SplitNeedsSingleTrack { selected: usize },

    #[error("Track {0} not found")]
    UnknownTrack(TrackId),

    #[error("No detections for track {track} at or after frame {frame} to move to a new track")]
    NothingToSplit { track: TrackId, frame: u32 },

    #[error("Label must not be empty")]
    EmptyLabel,

    #[error("No track IDs left to allocate")]
    IdSpaceExhausted,
}

/// One step of an edit script, as read from JSON.
///
/// ```
/// use motfix::edit::Edit;
///
/// let script: Vec<Edit> = serde_json::from_str(r#"[
///     {"op": "toggle", "track": "T2"},
///     {"op": "toggle", "track": "T3"},
///     {"op": "merge"},
///     {"op": "relabel", "track": "T2", "label": "Cyclist"}
/// ]"#).unwrap();
/// assert_eq!(script.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    /// Toggle a track in the selection and focus it.
    Toggle { track: TrackId },
    /// Empty the selection and drop focus.
    Clear,
    /// Merge the selected tracks.
    Merge,
    /// Split the selected track at the current frame.
    Split,
    /// Set a track's label.
    Relabel { track: TrackId, label: String },
    /// Move to a frame (clamped to the sequence).
    Frame { frame: u32 },
}

/// Fuzz-only entrypoint: applies a JSON edit script to the demo dataset,
/// skipping refused edits, and checks every track reference still resolves.
#[cfg(feature = "fuzzing")]
pub fn fuzz_apply_script(bytes: &[u8]) -> Result<(), serde_json::Error> {
    let script: Vec<Edit> = serde_json::from_slice(bytes)?;
    let mut store = crate::store::Store::default();
    for edit in script.iter().take(256) {
        let _ = store.apply(edit);
        assert!(store.dataset().is_consistent());
    }
    Ok(())
}
