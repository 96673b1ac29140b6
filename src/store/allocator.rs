//! Track id and color allocation for tracks created during editing.

use crate::model::{Track, TrackId};

/// Display palette cycled through by new tracks.
pub const TRACK_COLORS: [&str; 10] = [
    "#EF4444", // red
    "#3B82F6", // blue
    "#10B981", // green
    "#F59E0B", // amber
    "#6366F1", // indigo
    "#EC4899", // pink
    "#8B5CF6", // violet
    "#D946EF", // fuchsia
    "#06B6D4", // cyan
    "#F97316", // orange
];

/// Hands out `T<n>` ids and palette colors.
///
/// Ids only grow: the counter starts above every numeric suffix in the track
/// set it was seeded from and never goes back, even after tracks are merged
/// away. Once `T18446744073709551615` has been seeded or issued the id space
/// is exhausted and no further ids are handed out. The color cursor is
/// independent of the id counter.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityAllocator {
    next_id: Option<u64>,
    color_cursor: usize,
    palette: Vec<String>,
}

impl IdentityAllocator {
    /// Seeds an allocator from the given track set.
    ///
    /// The counter becomes `max(numeric suffix) + 1` (ids without a suffix
    /// count as 0) and the color cursor `tracks.len() % palette.len()`. An
    /// empty palette falls back to [`TRACK_COLORS`].
    pub fn seeded(tracks: &[Track], palette: &[String]) -> Self {
        let palette: Vec<String> = if palette.is_empty() {
            TRACK_COLORS.iter().map(|c| c.to_string()).collect()
        } else {
            palette.to_vec()
        };
        let max_id = tracks
            .iter()
            .filter_map(|t| t.id.numeric_suffix())
            .max()
            .unwrap_or(0);

        Self {
            next_id: max_id.checked_add(1),
            color_cursor: tracks.len() % palette.len(),
            palette,
        }
    }

    /// Returns a fresh id and advances the counter, or `None` once the id
    /// space is exhausted.
    pub fn next_track_id(&mut self) -> Option<TrackId> {
        let number = self.next_id?;
        self.next_id = number.checked_add(1);
        Some(TrackId::from_number(number))
    }

    /// Returns the next palette color and advances the cursor.
    pub fn next_color(&mut self) -> String {
        let color = self.palette[self.color_cursor].clone();
        self.color_cursor = (self.color_cursor + 1) % self.palette.len();
        color
    }

    /// Numeric value the next issued id will carry.
    pub fn peek_next_number(&self) -> Option<u64> {
        self.next_id
    }
}

impl Default for IdentityAllocator {
    fn default() -> Self {
        Self::seeded(&[], &[])
    }
}
