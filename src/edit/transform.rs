//! Merge, split and relabel as whole-dataset rewrites.

use std::collections::BTreeSet;

use super::PreconditionError;
use crate::model::{Dataset, Track, TrackId};
use crate::store::IdentityAllocator;

/// Result of a successful merge.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    pub dataset: Dataset,
    /// The surviving track.
    pub target: TrackId,
    /// Tracks that were removed from the dataset.
    pub removed: Vec<TrackId>,
}

/// Result of a successful split.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOutcome {
    pub dataset: Dataset,
    /// The track that was split; it keeps the earlier detections.
    pub source: TrackId,
    /// The newly created track holding the later detections.
    pub new_track: TrackId,
    /// Number of detections moved to the new track.
    pub moved: usize,
}

/// Merges the selected tracks into the lexicographically smallest one.
///
/// Every detection of the other tracks is rebound to the target and takes
/// the target's label; the other tracks are removed. Duplicate ids in
/// `selected` count once.
pub fn merge_tracks(
    dataset: &Dataset,
    selected: &[TrackId],
) -> Result<MergeOutcome, PreconditionError> {
    let sorted: BTreeSet<&TrackId> = selected.iter().collect();
    if sorted.len() < 2 {
        return Err(PreconditionError::NotEnoughTracksToMerge {
            selected: sorted.len(),
        });
    }

    let mut ids = sorted.into_iter();
    let target_id = ids.next().cloned().ok_or(PreconditionError::NotEnoughTracksToMerge {
        selected: 0,
    })?;
    let sources: BTreeSet<&TrackId> = ids.collect();

    let target = dataset
        .track(target_id.as_str())
        .ok_or_else(|| PreconditionError::UnknownTrack(target_id.clone()))?;
    let label = target.label.clone();

    let mut next = dataset.clone();
    for detection in next
        .detections
        .iter_mut()
        .filter(|d| sources.contains(&d.track_id))
    {
        detection.track_id = target_id.clone();
        detection.label = label.clone();
    }

    let removed: Vec<TrackId> = next
        .tracks
        .iter()
        .filter(|t| sources.contains(&t.id))
        .map(|t| t.id.clone())
        .collect();
    next.tracks.retain(|t| !sources.contains(&t.id));

    Ok(MergeOutcome {
        dataset: next,
        target: target_id,
        removed,
    })
}

/// Splits the single selected track at `frame`.
///
/// Detections on `frame` or later move to a new track that inherits the
/// label and takes the allocator's next id and color. The allocator is only
/// touched once the split is known to succeed; an exhausted id space refuses
/// the split before any color is taken.
pub fn split_track(
    dataset: &Dataset,
    selected: &[TrackId],
    frame: u32,
    allocator: &mut IdentityAllocator,
) -> Result<SplitOutcome, PreconditionError> {
    let [source_id] = selected else {
        return Err(PreconditionError::SplitNeedsSingleTrack {
            selected: selected.len(),
        });
    };

    let source = dataset
        .track(source_id.as_str())
        .ok_or_else(|| PreconditionError::UnknownTrack(source_id.clone()))?;

    let moves = |track_id: &TrackId, at: u32| track_id == source_id && at >= frame;
    let moved = dataset
        .detections
        .iter()
        .filter(|d| moves(&d.track_id, d.frame))
        .count();
    if moved == 0 {
        return Err(PreconditionError::NothingToSplit {
            track: source_id.clone(),
            frame,
        });
    }

    let new_id = allocator
        .next_track_id()
        .ok_or(PreconditionError::IdSpaceExhausted)?;
    let new_track = Track::new(new_id.clone(), source.label.clone(), allocator.next_color());

    let mut next = dataset.clone();
    for detection in next.detections.iter_mut() {
        if moves(&detection.track_id, detection.frame) {
            detection.track_id = new_track.id.clone();
            detection.label = new_track.label.clone();
        }
    }
    next.tracks.push(new_track);

    Ok(SplitOutcome {
        dataset: next,
        source: source_id.clone(),
        new_track: new_id,
        moved,
    })
}

/// Sets a track's label and the label of every detection it owns.
///
/// The label is trimmed first; an empty result is refused.
pub fn relabel_track(
    dataset: &Dataset,
    track_id: &str,
    label: &str,
) -> Result<Dataset, PreconditionError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(PreconditionError::EmptyLabel);
    }
    if !dataset.contains_track(track_id) {
        return Err(PreconditionError::UnknownTrack(TrackId::new(track_id)));
    }

    let mut next = dataset.clone();
    for track in next.tracks.iter_mut().filter(|t| t.id.as_str() == track_id) {
        track.label = label.to_string();
    }
    for detection in next
        .detections
        .iter_mut()
        .filter(|d| d.track_id.as_str() == track_id)
    {
        detection.label = label.to_string();
    }

    Ok(next)
}
