//! Selection and focus state.

use crate::model::TrackId;

/// The set of selected tracks plus the focused one.
///
/// Selection keeps insertion order. Focus is independent of selection: a
/// track can be focused without being selected and the other way round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Vec<TrackId>,
    focused: Option<TrackId>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in the order they were added.
    pub fn ids(&self) -> &[TrackId] {
        &self.selected
    }

    /// The focused track, if any.
    pub fn focused(&self) -> Option<&TrackId> {
        self.focused.as_ref()
    }

    /// Returns true if the track is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Adds the track if absent, removes it otherwise, and focuses it.
    pub fn toggle(&mut self, id: TrackId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.clone());
        }
        self.focused = Some(id);
    }

    /// Toggles the focused track. Returns false when nothing is focused.
    pub fn toggle_focused(&mut self) -> bool {
        match self.focused.clone() {
            Some(id) => {
                self.toggle(id);
                true
            }
            None => false,
        }
    }

    /// Drops every selected track and the focus.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.focused = None;
    }

    /// Replaces the selection with a single selected and focused track.
    pub fn collapse_to(&mut self, id: TrackId) {
        self.selected = vec![id.clone()];
        self.focused = Some(id);
    }

    fn focused_index(&self, order: &[TrackId]) -> Option<usize> {
        let focused = self.focused.as_ref()?;
        order.iter().position(|id| id == focused)
    }

    /// Moves focus one step down `order`, clamped at the last entry.
    ///
    /// Without focus, or when the focused track is no longer listed, focus
    /// moves to the first entry.
    pub fn focus_next(&mut self, order: &[TrackId]) {
        if order.is_empty() {
            return;
        }
        let next = match self.focused_index(order) {
            Some(idx) => (idx + 1).min(order.len() - 1),
            None => 0,
        };
        self.focused = Some(order[next].clone());
    }

    /// Moves focus one step up `order`, clamped at the first entry.
    ///
    /// Without focus nothing happens; a focused track that is no longer
    /// listed moves focus to the first entry.
    pub fn focus_previous(&mut self, order: &[TrackId]) {
        if order.is_empty() || self.focused.is_none() {
            return;
        }
        let prev = self
            .focused_index(order)
            .map(|idx| idx.saturating_sub(1))
            .unwrap_or(0);
        self.focused = Some(order[prev].clone());
    }

    pub fn focus_first(&mut self, order: &[TrackId]) {
        if let Some(first) = order.first() {
            self.focused = Some(first.clone());
        }
    }

    pub fn focus_last(&mut self, order: &[TrackId]) {
        if let Some(last) = order.last() {
            self.focused = Some(last.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Vec<TrackId> {
        ["T1", "T2", "T3"].into_iter().map(TrackId::from).collect()
    }

    #[test]
    fn test_toggle_adds_removes_and_focuses() {
        let mut sel = Selection::new();
        sel.toggle("T2".into());
        sel.toggle("T1".into());
        assert_eq!(sel.ids(), &[TrackId::from("T2"), TrackId::from("T1")]);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T1"));

        sel.toggle("T2".into());
        assert_eq!(sel.ids(), &[TrackId::from("T1")]);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T2"));
    }

    #[test]
    fn test_double_toggle_restores_selection() {
        let mut sel = Selection::new();
        sel.toggle("T1".into());
        sel.toggle("T1".into());
        assert!(sel.is_empty());
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T1"));
    }

    #[test]
    fn test_clear_and_collapse() {
        let mut sel = Selection::new();
        sel.toggle("T1".into());
        sel.toggle("T3".into());
        sel.collapse_to("T1".into());
        assert_eq!(sel.len(), 1);
        assert!(sel.contains("T1"));

        sel.clear();
        assert!(sel.is_empty());
        assert!(sel.focused().is_none());
    }

    #[test]
    fn test_focus_next_walks_and_clamps() {
        let order = order();
        let mut sel = Selection::new();

        sel.focus_next(&order);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T1"));
        sel.focus_next(&order);
        sel.focus_next(&order);
        sel.focus_next(&order);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T3"));
    }

    #[test]
    fn test_focus_previous() {
        let order = order();
        let mut sel = Selection::new();

        sel.focus_previous(&order);
        assert!(sel.focused().is_none());

        sel.focus_last(&order);
        sel.focus_previous(&order);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T2"));
        sel.focus_previous(&order);
        sel.focus_previous(&order);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T1"));
    }

    #[test]
    fn test_stale_focus_resets_to_first() {
        let order = order();
        let mut sel = Selection::new();
        sel.toggle("T9".into());

        sel.focus_previous(&order);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T1"));

        sel.toggle("T9".into());
        sel.focus_next(&order);
        assert_eq!(sel.focused().map(TrackId::as_str), Some("T1"));
    }

    #[test]
    fn test_toggle_focused() {
        let mut sel = Selection::new();
        assert!(!sel.toggle_focused());

        sel.focus_first(&order());
        assert!(sel.toggle_focused());
        assert!(sel.contains("T1"));
    }
}
