//! The bundled demo dataset.
//!
//! Four tracks over 30 frames, laid out to exercise every edit: T2 and T3
//! are one pedestrian falsely split in two (and T3 mislabeled), T1 and T4
//! run the full sequence.

use crate::model::{BoundingBox, Dataset, Detection, Track};
use crate::store::TRACK_COLORS;

/// Number of frames in the demo sequence.
pub const SAMPLE_FRAMES: u32 = 30;

/// Builds the demo dataset.
pub fn sample_dataset() -> Dataset {
    let tracks = vec![
        Track::new("T1", "Pedestrian", TRACK_COLORS[0]),
        Track::new("T2", "Pedestrian", TRACK_COLORS[1]),
        Track::new("T3", "Cyclist", TRACK_COLORS[2]),
        Track::new("T4", "Vehicle", TRACK_COLORS[3]),
    ];

    let half = SAMPLE_FRAMES / 2;
    let mut detections = Vec::new();

    for i in 0..SAMPLE_FRAMES {
        let t = i as f64;
        detections.push(detection("T1", "Pedestrian", i, 10.0 + 1.5 * t, 20.0 + 0.5 * t, 5.0, 15.0));
    }

    for i in 0..half {
        let t = i as f64;
        detections.push(detection("T2", "Pedestrian", i, 40.0 + 1.8 * t, 30.0 + 0.8 * t, 6.0, 16.0));
    }

    // T3 picks up where T2 stops, offset by a visible jump.
    let start_x = 40.0 + 1.8 * half as f64 + 5.0;
    let start_y = 30.0 + 0.8 * half as f64 + 5.0;
    for i in half..SAMPLE_FRAMES {
        let t = (i - half) as f64;
        detections.push(detection("T3", "Cyclist", i, start_x + 1.8 * t, start_y + 0.8 * t, 6.0, 16.0));
    }

    for i in 0..SAMPLE_FRAMES {
        let t = i as f64;
        detections.push(detection("T4", "Vehicle", i, 80.0 - 2.0 * t, 60.0 - 0.2 * t, 15.0, 10.0));
    }

    Dataset::new(tracks, detections)
}

/// A detection with its corner clamped so the box stays inside the frame.
fn detection(track: &str, label: &str, frame: u32, x: f64, y: f64, w: f64, h: f64) -> Detection {
    let bbox = BoundingBox::new(
        x.min(100.0 - w).max(0.0),
        y.min(100.0 - h).max(0.0),
        w,
        h,
    );
    Detection::new(format!("{}_F{}", track, frame), track, bbox, label, frame)
}
