//! The editing state container.
//!
//! [`Store`] owns the dataset, the current frame, the selection and the id
//! allocator. Every mutation goes through one of its methods, runs to
//! completion, and is announced to subscribers as a [`Change`]. Failed
//! operations return an error and leave every field as it was.

mod allocator;

pub use allocator::{IdentityAllocator, TRACK_COLORS};

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::edit::{self, Edit, PreconditionError, Selection};
use crate::model::{Dataset, DatasetDocument, Detection, Track, TrackId};
use crate::sample::{sample_dataset, SAMPLE_FRAMES};
use crate::validation::{self, ValidationError};

/// Frame count used when none is configured.
pub const DEFAULT_TOTAL_FRAMES: u32 = SAMPLE_FRAMES;

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    /// Length of the frame sequence; frame navigation stays below it.
    pub total_frames: u32,
    /// Colors handed to new tracks. Empty means [`TRACK_COLORS`].
    pub palette: Vec<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            total_frames: DEFAULT_TOTAL_FRAMES,
            palette: TRACK_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A committed state change.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    /// A document replaced the dataset.
    Loaded { tracks: usize, detections: usize },
    /// The demo dataset replaced the dataset.
    Reset,
    /// Selection or focus changed.
    SelectionChanged,
    FrameChanged { frame: u32 },
    Merged { target: TrackId, removed: Vec<TrackId> },
    Split { source: TrackId, new_track: TrackId, moved: usize },
    Relabeled { track: TrackId, label: String },
}

/// Handle for one asynchronous import.
///
/// Only the most recently issued ticket may commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportTicket(u64);

/// What happened to a finished import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Committed,
    /// A newer import was started; this one was dropped unread.
    Stale,
}

/// A track as listed to the user, with its selection flag.
#[derive(Clone, Debug, PartialEq)]
pub struct ListedTrack<'a> {
    pub track: &'a Track,
    pub is_selected: bool,
    pub is_focused: bool,
    pub detection_count: usize,
}

type Subscriber = Box<dyn FnMut(&Change)>;

/// The authoritative editing state.
pub struct Store {
    dataset: Dataset,
    current_frame: u32,
    selection: Selection,
    allocator: IdentityAllocator,
    options: StoreOptions,
    latest_ticket: u64,
    revision: u64,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("tracks", &self.dataset.tracks.len())
            .field("detections", &self.dataset.detections.len())
            .field("current_frame", &self.current_frame)
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

impl Store {
    /// Creates a store holding the demo dataset.
    pub fn new(options: StoreOptions) -> Self {
        let dataset = sample_dataset();
        let allocator = IdentityAllocator::seeded(&dataset.tracks, &options.palette);
        Self {
            dataset,
            current_frame: 0,
            selection: Selection::new(),
            allocator,
            options,
            latest_ticket: 0,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    /// Creates a store from an already-typed dataset.
    ///
    /// The dataset must pass the same integrity checks as an imported
    /// document.
    pub fn with_dataset(dataset: Dataset, options: StoreOptions) -> Result<Self, ValidationError> {
        validation::check_integrity(&dataset)?;
        let mut store = Self::new(options);
        store.replace_dataset(dataset);
        Ok(store)
    }

    /// Registers a callback run after every committed change.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&Change) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&mut self, change: Change) {
        self.revision += 1;
        for subscriber in &mut self.subscribers {
            subscriber(&change);
        }
    }

    // --- queries ---

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn tracks(&self) -> &[Track] {
        &self.dataset.tracks
    }

    pub fn detections(&self) -> &[Detection] {
        &self.dataset.detections
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn total_frames(&self) -> u32 {
        self.options.total_frames
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn focused(&self) -> Option<&TrackId> {
        self.selection.focused()
    }

    /// Number of committed changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Detections drawn on the given frame.
    pub fn detections_for_frame(&self, frame: u32) -> Vec<&Detection> {
        self.dataset.detections_on_frame(frame).collect()
    }

    pub fn detections_of<'a>(&'a self, track: &'a str) -> Vec<&'a Detection> {
        self.dataset.detections_of(track).collect()
    }

    /// Detections drawn on the current frame.
    pub fn current_detections(&self) -> Vec<&Detection> {
        self.detections_for_frame(self.current_frame)
    }

    /// Tracks in listing order: by numeric id, falling back to string order.
    pub fn track_listing(&self) -> Vec<ListedTrack<'_>> {
        let mut tracks: Vec<&Track> = self.dataset.tracks.iter().collect();
        tracks.sort_by(|a, b| listing_order(&a.id, &b.id));
        tracks
            .into_iter()
            .map(|track| ListedTrack {
                track,
                is_selected: self.selection.contains(track.id.as_str()),
                is_focused: self.selection.focused() == Some(&track.id),
                detection_count: self.dataset.detections_of(track.id.as_str()).count(),
            })
            .collect()
    }

    fn listing_ids(&self) -> Vec<TrackId> {
        self.track_listing()
            .into_iter()
            .map(|entry| entry.track.id.clone())
            .collect()
    }

    /// Distinct track labels, sorted.
    pub fn unique_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.dataset.tracks.iter().map(|t| t.label.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Label suggestions for `input` drawn from the labels in use.
    pub fn suggest_labels(&self, input: &str) -> Vec<String> {
        edit::suggest_labels(input, self.unique_labels())
    }

    // --- selection and focus ---

    pub fn toggle_selection(&mut self, id: impl Into<TrackId>) {
        let id = id.into();
        log::debug!("Toggling selection of {}", id);
        self.selection.toggle(id);
        self.notify(Change::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify(Change::SelectionChanged);
    }

    /// Toggles the focused track. No-op without focus.
    pub fn toggle_focused(&mut self) {
        if self.selection.toggle_focused() {
            self.notify(Change::SelectionChanged);
        }
    }

    pub fn focus_next(&mut self) {
        let order = self.listing_ids();
        self.move_focus(|sel| sel.focus_next(&order));
    }

    pub fn focus_previous(&mut self) {
        let order = self.listing_ids();
        self.move_focus(|sel| sel.focus_previous(&order));
    }

    pub fn focus_first(&mut self) {
        let order = self.listing_ids();
        self.move_focus(|sel| sel.focus_first(&order));
    }

    pub fn focus_last(&mut self) {
        let order = self.listing_ids();
        self.move_focus(|sel| sel.focus_last(&order));
    }

    fn move_focus(&mut self, step: impl FnOnce(&mut Selection)) {
        let before = self.selection.focused().cloned();
        step(&mut self.selection);
        if self.selection.focused() != before.as_ref() {
            self.notify(Change::SelectionChanged);
        }
    }

    // --- frame navigation ---

    /// Moves to `frame`, clamped into the sequence.
    pub fn set_frame(&mut self, frame: u32) {
        let frame = frame.min(self.options.total_frames.saturating_sub(1));
        if frame != self.current_frame {
            self.current_frame = frame;
            self.notify(Change::FrameChanged { frame });
        }
    }

    pub fn next_frame(&mut self) {
        self.set_frame(self.current_frame.saturating_add(1));
    }

    pub fn previous_frame(&mut self) {
        self.set_frame(self.current_frame.saturating_sub(1));
    }

    // --- edits ---

    /// Merges the selected tracks. Returns the surviving track.
    pub fn merge_selected(&mut self) -> Result<TrackId, PreconditionError> {
        let outcome = edit::merge_tracks(&self.dataset, self.selection.ids())?;
        log::info!(
            "Merged {:?} into {}",
            outcome.removed,
            outcome.target
        );

        self.dataset = outcome.dataset;
        self.selection.collapse_to(outcome.target.clone());
        self.notify(Change::Merged {
            target: outcome.target.clone(),
            removed: outcome.removed,
        });
        Ok(outcome.target)
    }

    /// Splits the selected track at the current frame. Returns the new track.
    pub fn split_selected(&mut self) -> Result<TrackId, PreconditionError> {
        let outcome = edit::split_track(
            &self.dataset,
            self.selection.ids(),
            self.current_frame,
            &mut self.allocator,
        )?;
        log::info!(
            "Split {} at frame {}: {} detection(s) moved to {}",
            outcome.source,
            self.current_frame,
            outcome.moved,
            outcome.new_track
        );

        self.dataset = outcome.dataset;
        self.selection.collapse_to(outcome.source.clone());
        self.notify(Change::Split {
            source: outcome.source,
            new_track: outcome.new_track.clone(),
            moved: outcome.moved,
        });
        Ok(outcome.new_track)
    }

    /// Sets a track's label and every one of its detections' labels.
    pub fn relabel(&mut self, track: &str, label: &str) -> Result<(), PreconditionError> {
        self.dataset = edit::relabel_track(&self.dataset, track, label)?;
        let label = label.trim().to_string();
        log::info!("Relabeled {} as '{}'", track, label);
        self.notify(Change::Relabeled {
            track: TrackId::new(track),
            label,
        });
        Ok(())
    }

    /// Applies one scripted edit.
    pub fn apply(&mut self, edit: &Edit) -> Result<(), PreconditionError> {
        match edit {
            Edit::Toggle { track } => self.toggle_selection(track.clone()),
            Edit::Clear => self.clear_selection(),
            Edit::Merge => {
                self.merge_selected()?;
            }
            Edit::Split => {
                self.split_selected()?;
            }
            Edit::Relabel { track, label } => self.relabel(track.as_str(), label)?,
            Edit::Frame { frame } => self.set_frame(*frame),
        }
        Ok(())
    }

    // --- load, reset, export ---

    /// Validates and loads a document in one step.
    pub fn load_document(&mut self, document: &Value) -> Result<(), ValidationError> {
        let ticket = self.begin_import();
        self.finish_import(ticket, document).map(|_| ())
    }

    /// Starts an import whose content will arrive later.
    ///
    /// Issuing a ticket makes every earlier ticket stale.
    pub fn begin_import(&mut self) -> ImportTicket {
        self.latest_ticket += 1;
        ImportTicket(self.latest_ticket)
    }

    /// Finishes an import started with [`Store::begin_import`].
    ///
    /// A stale ticket is dropped without reading the document. Otherwise the
    /// document is validated and, on success, replaces the dataset: frame
    /// back to 0, selection cleared, allocator re-seeded.
    pub fn finish_import(
        &mut self,
        ticket: ImportTicket,
        document: &Value,
    ) -> Result<ImportOutcome, ValidationError> {
        if ticket.0 != self.latest_ticket {
            log::warn!(
                "Discarding stale import {} (latest is {})",
                ticket.0,
                self.latest_ticket
            );
            return Ok(ImportOutcome::Stale);
        }

        let dataset = validation::validate_document(document).map_err(|err| {
            log::warn!("Rejected import: {}", err);
            err
        })?;
        log::info!(
            "Imported {} track(s) and {} detection(s)",
            dataset.tracks.len(),
            dataset.detections.len()
        );

        let change = Change::Loaded {
            tracks: dataset.tracks.len(),
            detections: dataset.detections.len(),
        };
        self.replace_dataset(dataset);
        self.notify(change);
        Ok(ImportOutcome::Committed)
    }

    /// Returns to the demo dataset.
    pub fn reset(&mut self) {
        log::info!("Resetting to the sample dataset");
        self.replace_dataset(sample_dataset());
        self.notify(Change::Reset);
    }

    fn replace_dataset(&mut self, dataset: Dataset) {
        self.allocator = IdentityAllocator::seeded(&dataset.tracks, &self.options.palette);
        self.dataset = dataset;
        self.current_frame = 0;
        self.selection.clear();
    }

    /// Snapshot of the current state as a persistable document.
    pub fn export_document(&self) -> DatasetDocument {
        DatasetDocument::from_dataset(&self.dataset, self.options.total_frames)
    }
}

fn listing_order(a: &TrackId, b: &TrackId) -> Ordering {
    match (a.numeric_suffix(), b.numeric_suffix()) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
