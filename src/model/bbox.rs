//! Bounding boxes in frame-percentage space.

use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its top-left corner and size, each as a
/// percentage of the frame dimensions.
///
/// The nominal range is 0 to 100 but nothing enforces it; the audit reports
/// boxes that stray outside instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[inline]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (`x + w`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Returns true if all four fields are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Returns true if the box lies inside the 0..=100 frame range.
    pub fn is_within_frame(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.w >= 0.0
            && self.h >= 0.0
            && self.right() <= 100.0
            && self.bottom() <= 100.0
    }
}
