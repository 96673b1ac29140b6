//! Validation report types for structured error reporting.
//!
//! This module provides rich, structured validation results that can be
//! displayed to users, written to files, or processed programmatically.

use serde::Serialize;
use std::fmt;

/// The result of auditing a dataset.
///
/// Contains all issues found, categorized by severity.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// All issues found during the audit.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any issue carries the given code.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    /// The severity of the issue.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    /// A human-readable description of the issue.
    pub message: String,

    /// Context about where the issue occurred.
    pub context: IssueContext,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    /// Creates a new error.
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Suspicious but editable data.
    Warning,
    /// Data that breaks an invariant the editor relies on.
    Error,
}

/// A stable code identifying the type of validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Document shape
    /// The document is not a JSON object.
    NotAnObject,
    /// `tracks` or `detections` is present but not an array.
    NotAnArray,
    /// A track is missing a non-empty `id`, `label` or `color`.
    InvalidTrack,
    /// A detection is missing a non-empty `id`, `trackId` or `label`.
    InvalidDetection,
    /// A detection's `frame` is missing or not a non-negative integer.
    InvalidFrame,
    /// A detection's `box` is missing or has a non-numeric field.
    InvalidBox,

    // Integrity
    /// Multiple tracks have the same ID.
    DuplicateTrackId,
    /// Multiple detections have the same ID.
    DuplicateDetectionId,
    /// A detection references a track that does not exist.
    MissingTrackRef,

    // Audit only
    /// A box has non-finite fields.
    BoxNotFinite,
    /// A box extends outside the 0..=100 frame range.
    BoxOutsideFrame,
    /// A detection's label differs from its track's label.
    LabelOutOfSync,
    /// A track has more than one detection on the same frame.
    DuplicateTrackFrame,
    /// A track has no detections.
    EmptyTrack,
    /// A detection sits at or beyond the configured frame count.
    FrameOutOfRange,
}

/// Context about where a validation issue occurred.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    /// Issue with the document as a whole.
    Document,
    /// Issue with the track at a position in the `tracks` array.
    TrackAt { index: usize },
    /// Issue with the detection at a position in the `detections` array.
    DetectionAt { index: usize },
    /// Issue with a specific track.
    Track { id: String },
    /// Issue with a specific detection.
    Detection { id: String },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Document => write!(f, "document"),
            IssueContext::TrackAt { index } => write!(f, "track at index {}", index),
            IssueContext::DetectionAt { index } => write!(f, "detection at index {}", index),
            IssueContext::Track { id } => write!(f, "track {}", id),
            IssueContext::Detection { id } => write!(f, "detection {}", id),
        }
    }
}
