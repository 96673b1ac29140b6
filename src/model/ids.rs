//! Newtype IDs for tracks and detections.
//!
//! Both IDs are strings on the wire. Wrapping them keeps a detection ID from
//! being passed where a track ID is expected (a detection's `trackId` is a
//! foreign key, its `id` is not).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a track, conventionally `"T" + integer` (e.g. `T12`).
///
/// Ordering is plain string ordering, so `T10 < T2`. Merge relies on that
/// ordering to pick its survivor.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Creates a new TrackId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the canonical `T<n>` form.
    pub fn from_number(n: u64) -> Self {
        Self(format!("T{}", n))
    }

    /// Returns the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of the id: an optional leading `T` followed by digits.
    ///
    /// Trailing characters after the digits are ignored (`T7a` is 7). Returns
    /// `None` when no digits follow the prefix.
    pub fn numeric_suffix(&self) -> Option<u64> {
        self.digits().parse().ok()
    }

    /// Returns true if the id has a numeric part too large for `u64`.
    pub fn has_oversized_suffix(&self) -> bool {
        let digits = self.digits();
        !digits.is_empty() && digits.parse::<u64>().is_err()
    }

    fn digits(&self) -> &str {
        let rest = self.0.strip_prefix('T').unwrap_or(&self.0);
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

impl fmt::Debug for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackId({})", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TrackId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        TrackId::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        TrackId(id)
    }
}

/// Identifier of a single detection, stable across edits (e.g. `T1_F0`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionId(String);

impl DetectionId {
    /// Creates a new DetectionId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DetectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DetectionId({})", self.0)
    }
}

impl fmt::Display for DetectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DetectionId {
    fn from(id: &str) -> Self {
        DetectionId::new(id)
    }
}

impl From<String> for DetectionId {
    fn from(id: String) -> Self {
        DetectionId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ordering_is_lexicographic() {
        assert!(TrackId::from("T1") < TrackId::from("T3"));
        assert!(TrackId::from("T10") < TrackId::from("T2"));
    }

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(TrackId::from("T12").numeric_suffix(), Some(12));
        assert_eq!(TrackId::from("7").numeric_suffix(), Some(7));
        assert_eq!(TrackId::from("T7a").numeric_suffix(), Some(7));
        assert_eq!(TrackId::from("track").numeric_suffix(), None);
        assert_eq!(TrackId::from("T").numeric_suffix(), None);
    }

    #[test]
    fn test_oversized_suffix() {
        assert!(!TrackId::from("T18446744073709551615").has_oversized_suffix());
        assert!(TrackId::from("T18446744073709551616").has_oversized_suffix());
        assert_eq!(TrackId::from("T18446744073709551616").numeric_suffix(), None);
        assert!(!TrackId::from("track").has_oversized_suffix());
    }

    #[test]
    fn test_from_number() {
        assert_eq!(TrackId::from_number(5).as_str(), "T5");
    }

    #[test]
    fn test_id_hash_and_borrow() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(TrackId::from("T1"));
        set.insert(TrackId::from("T2"));
        set.insert(TrackId::from("T1")); // duplicate
        assert_eq!(set.len(), 2);
        assert!(set.contains("T2"));
    }
}
