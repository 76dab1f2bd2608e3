//! Validation data types
//!
//! Error records, run status, events and the rules a run is configured with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Point;

/// Kind of geometry defect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    SelfIntersection,
    RingNotClosed,
    TooFewPoints,
    DuplicateNode,
    HoleOutsideShell,
    HoleIntersectsShell,
    HolesIntersectEachOther,
    RingIntersectsAnotherPart,
    PartInsideAnotherPart,
}

/// Broad defect classes used when summarizing reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DefectCategory {
    /// Rings that cannot form a valid boundary at all
    Structural,
    /// Rings that exist but relate to each other incorrectly
    Topological,
    /// Redundant input that does not change the shape
    DataQuality,
}

impl ErrorKind {
    pub fn category(&self) -> DefectCategory {
        match self {
            ErrorKind::TooFewPoints | ErrorKind::RingNotClosed => DefectCategory::Structural,
            ErrorKind::DuplicateNode => DefectCategory::DataQuality,
            ErrorKind::SelfIntersection
            | ErrorKind::HoleOutsideShell
            | ErrorKind::HoleIntersectsShell
            | ErrorKind::HolesIntersectEachOther
            | ErrorKind::RingIntersectsAnotherPart
            | ErrorKind::PartInsideAnotherPart => DefectCategory::Topological,
        }
    }
}

/// A single geometry defect
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    /// Where the defect was found, when it has a single location
    pub location: Option<Point>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(kind: ErrorKind, message: impl Into<String>, location: Point) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Some(location),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Lifecycle of a validation run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Idle,
    Running,
    Finished,
    Cancelled,
}

impl RunStatus {
    /// Finished or cancelled; the error list is frozen
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Finished | RunStatus::Cancelled)
    }
}

/// Totals reported when a run ends
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub status: RunStatus,
    pub error_count: usize,
    pub elapsed_ms: f64,
}

impl ValidationSummary {
    /// Human-readable one-liner for status bars and logs
    pub fn message(&self) -> String {
        match (self.status, self.error_count) {
            (RunStatus::Cancelled, _) => "Geometry validation was aborted.".to_string(),
            (_, 0) => "Geometry is valid.".to_string(),
            (_, 1) => "Geometry has 1 error.".to_string(),
            (_, n) => format!("Geometry has {} errors.", n),
        }
    }
}

/// Notifications pushed by a running validation, in emission order
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ValidationEvent {
    ErrorFound(ValidationError),
    Finished(ValidationSummary),
    Cancelled(ValidationSummary),
}

/// Knobs for a validation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Rings with at least this many edges are checked through an R-tree
    pub spatial_index_threshold: usize,
    /// Report polygon parts lying inside another part's shell
    pub check_part_nesting: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            spatial_index_threshold: 64,
            check_part_nesting: true,
        }
    }
}
