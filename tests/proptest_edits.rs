use std::collections::BTreeSet;

use motfix::edit::{merge_tracks, relabel_track, split_track, PreconditionError};
use motfix::model::io_json::{from_json_str, to_json_string};
use motfix::model::{Dataset, DatasetDocument, TrackId};
use motfix::store::{IdentityAllocator, TRACK_COLORS};
use motfix::validation::validate_document;
use motfix::{Store, StoreOptions};
use proptest::prelude::*;

mod proptest_helpers;

use proptest_helpers::{arb_dataset, arb_dataset_with_selection, track_numbers};

fn palette() -> Vec<String> {
    TRACK_COLORS.iter().map(|c| c.to_string()).collect()
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn merge_keeps_every_detection_bound((dataset, selected) in arb_dataset_with_selection(6, 12)) {
        let distinct: BTreeSet<&TrackId> = selected.iter().collect();

        match merge_tracks(&dataset, &selected) {
            Ok(outcome) => {
                prop_assert!(distinct.len() >= 2);
                prop_assert_eq!(&outcome.target, *distinct.iter().next().unwrap());
                prop_assert!(outcome.dataset.is_consistent());
                prop_assert_eq!(outcome.dataset.detections.len(), dataset.detections.len());
                prop_assert_eq!(
                    outcome.dataset.tracks.len(),
                    dataset.tracks.len() - (distinct.len() - 1)
                );

                let label = &dataset.track(outcome.target.as_str()).unwrap().label;
                for (before, after) in dataset.detections.iter().zip(&outcome.dataset.detections) {
                    prop_assert_eq!(&before.id, &after.id);
                    prop_assert_eq!(before.frame, after.frame);
                    if distinct.contains(&before.track_id) {
                        prop_assert_eq!(&after.track_id, &outcome.target);
                        prop_assert_eq!(&after.label, label);
                    } else {
                        prop_assert_eq!(before, after);
                    }
                }
            }
            Err(err) => {
                prop_assert!(distinct.len() < 2);
                prop_assert_eq!(
                    err,
                    PreconditionError::NotEnoughTracksToMerge { selected: distinct.len() }
                );
            }
        }
    }

    #[test]
    fn split_partitions_by_frame(
        dataset in arb_dataset(5, 12),
        pick in any::<prop::sample::Index>(),
        frame in 0u32..14,
    ) {
        let source = dataset.tracks[pick.index(dataset.tracks.len())].id.clone();
        let mut allocator = IdentityAllocator::seeded(&dataset.tracks, &palette());
        let expected_number = allocator.peek_next_number();

        let later: Vec<_> = dataset
            .detections_of(source.as_str())
            .filter(|d| d.frame >= frame)
            .map(|d| d.id.clone())
            .collect();

        match split_track(&dataset, &[source.clone()], frame, &mut allocator) {
            Ok(outcome) => {
                prop_assert!(!later.is_empty());
                prop_assert_eq!(outcome.moved, later.len());
                prop_assert_eq!(outcome.new_track.numeric_suffix(), expected_number);
                prop_assert!(expected_number
                    .is_some_and(|next| track_numbers(&dataset).iter().all(|n| *n < next)));
                prop_assert!(outcome.dataset.is_consistent());

                let moved: Vec<_> = outcome
                    .dataset
                    .detections_of(outcome.new_track.as_str())
                    .map(|d| d.id.clone())
                    .collect();
                prop_assert_eq!(moved, later);
                prop_assert!(outcome
                    .dataset
                    .detections_of(source.as_str())
                    .all(|d| d.frame < frame));
            }
            Err(err) => {
                prop_assert!(later.is_empty());
                prop_assert_eq!(err, PreconditionError::NothingToSplit { track: source, frame });
                prop_assert_eq!(allocator.peek_next_number(), expected_number);
            }
        }
    }

    #[test]
    fn issued_ids_only_grow(dataset in arb_dataset(4, 10), frames in proptest::collection::vec(0u32..10, 1..8)) {
        let mut store = Store::with_dataset(dataset.clone(), StoreOptions {
            total_frames: 10,
            ..Default::default()
        })
        .expect("generated dataset is consistent");
        let mut issued = track_numbers(&dataset).into_iter().max().unwrap_or(0);

        for (round, frame) in frames.into_iter().enumerate() {
            let tracks: Vec<TrackId> = store.tracks().iter().map(|t| t.id.clone()).collect();
            let source = tracks[round % tracks.len()].clone();

            store.clear_selection();
            store.toggle_selection(source);
            store.set_frame(frame);
            if let Ok(new_track) = store.split_selected() {
                let number = new_track.numeric_suffix().unwrap();
                prop_assert!(number > issued);
                issued = number;
            }

            // Merges in between must not free ids for reuse.
            if tracks.len() >= 2 && round % 3 == 2 {
                let newest: Vec<TrackId> = store
                    .tracks()
                    .iter()
                    .rev()
                    .take(2)
                    .map(|t| t.id.clone())
                    .collect();
                store.clear_selection();
                for id in newest {
                    store.toggle_selection(id);
                }
                store.merge_selected().expect("two selected tracks merge");
            }
            prop_assert!(store.dataset().is_consistent());
        }
    }

    #[test]
    fn relabel_touches_only_its_track(
        dataset in arb_dataset(5, 8),
        pick in any::<prop::sample::Index>(),
        label in "[A-Z][a-z]{1,10}",
    ) {
        let track = dataset.tracks[pick.index(dataset.tracks.len())].id.clone();
        let next = relabel_track(&dataset, track.as_str(), &format!(" {} ", label)).expect("relabel");

        prop_assert_eq!(&next.track(track.as_str()).unwrap().label, &label);
        for (before, after) in dataset.detections.iter().zip(&next.detections) {
            if before.track_id == track {
                prop_assert_eq!(&after.label, &label);
            } else {
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn export_then_import_is_lossless(dataset in arb_dataset(5, 10)) {
        let document = DatasetDocument::from_dataset(&dataset, 10);
        let json = to_json_string(&document).expect("serialize document");
        let restored: Dataset = validate_document(&from_json_str(&json).expect("parse document"))
            .expect("exported document passes the gate");

        prop_assert_eq!(dataset, restored);
    }
}
