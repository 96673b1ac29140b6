#![allow(dead_code)]

use std::collections::BTreeSet;

use motfix::model::{BoundingBox, Dataset, Detection, Track, TrackId};
use motfix::store::TRACK_COLORS;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A consistent dataset: unique `T<n>` track ids, every detection bound to
/// one of them, at most one detection per track and frame.
pub fn arb_dataset(max_tracks: usize, max_frames: u32) -> BoxedStrategy<Dataset> {
    assert!(max_tracks > 0, "max_tracks must be > 0");
    assert!(max_frames > 0, "max_frames must be > 0");

    proptest::collection::btree_set(1u64..500, 1..=max_tracks)
        .prop_flat_map(move |numbers| {
            let count = numbers.len();
            (
                Just(numbers),
                proptest::collection::vec(label_strategy(), count..=count),
                proptest::collection::vec(
                    proptest::collection::vec(any::<bool>(), max_frames as usize),
                    count..=count,
                ),
            )
        })
        .prop_map(|(numbers, labels, masks)| build_dataset(numbers, labels, masks))
        .boxed()
}

/// A dataset together with a non-empty subset of its track ids.
pub fn arb_dataset_with_selection(
    max_tracks: usize,
    max_frames: u32,
) -> BoxedStrategy<(Dataset, Vec<TrackId>)> {
    arb_dataset(max_tracks, max_frames)
        .prop_flat_map(|dataset| {
            let count = dataset.tracks.len();
            (
                Just(dataset),
                proptest::collection::vec(any::<bool>(), count..=count),
                0..count,
            )
        })
        .prop_map(|(dataset, picks, fallback)| {
            let mut selected: Vec<TrackId> = dataset
                .tracks
                .iter()
                .zip(picks)
                .filter(|(_, pick)| *pick)
                .map(|(track, _)| track.id.clone())
                .collect();
            if selected.is_empty() {
                selected.push(dataset.tracks[fallback].id.clone());
            }
            (dataset, selected)
        })
        .boxed()
}

pub fn track_numbers(dataset: &Dataset) -> BTreeSet<u64> {
    dataset
        .tracks
        .iter()
        .filter_map(|t| t.id.numeric_suffix())
        .collect()
}

fn label_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("Pedestrian".to_string()),
        Just("Cyclist".to_string()),
        Just("Vehicle".to_string()),
        proptest::string::string_regex("[A-Z][a-z]{1,10}").expect("valid label regex"),
    ]
    .boxed()
}

fn build_dataset(numbers: BTreeSet<u64>, labels: Vec<String>, masks: Vec<Vec<bool>>) -> Dataset {
    let mut tracks = Vec::new();
    let mut detections = Vec::new();

    for (k, ((number, label), mask)) in numbers.into_iter().zip(labels).zip(masks).enumerate() {
        let id = TrackId::from_number(number);
        tracks.push(Track::new(
            id.clone(),
            label.clone(),
            TRACK_COLORS[k % TRACK_COLORS.len()],
        ));

        for (frame, present) in mask.into_iter().enumerate() {
            if !present {
                continue;
            }
            let frame = frame as u32;
            let bbox = BoundingBox::new(
                ((frame * 3 + k as u32 * 7) % 80) as f64,
                ((frame * 2 + k as u32 * 11) % 80) as f64,
                5.0 + (k % 10) as f64,
                10.0,
            );
            detections.push(Detection::new(
                format!("{}_F{}", id, frame),
                id.clone(),
                bbox,
                label.clone(),
                frame,
            ));
        }
    }

    Dataset::new(tracks, detections)
}
