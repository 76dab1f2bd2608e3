//! Geometry validity checks
//!
//! Ring-local checks run first, then hole/shell and part/part relations. Large
//! rings are scanned through an R-tree of their edges, and independent
//! geometries can be validated in parallel with Rayon.
//!
//! # Submodules
//! - `types` - Error records, run status, events and rules
//! - `segment` - Segment intersection and point-in-ring math
//! - `reporter` - Defect sinks and cancellation checkpoints
//! - `ring` - Ring-local checks
//! - `cross` - Hole, shell and part relations
//! - `checks` - Geometry walk shared by every entry point
//! - `run` - Background runs and their handles
//! - `runners` - Sync and async entry points
//! - `batch` - Parallel validation of many geometries

mod types;
pub mod segment;
mod reporter;
mod ring;
mod cross;
mod checks;
mod run;
mod runners;
mod batch;

// Re-export public types
pub use types::{
    DefectCategory, ErrorKind, RunStatus, ValidationError, ValidationEvent,
    ValidationRules, ValidationSummary,
};

pub use reporter::{CollectingReporter, Reporter};
pub use checks::CheckOutcome;
pub use run::{ValidationHandle, ValidationOutcome, ValidationRun};

// Re-export runner functions
pub use runners::{
    begin_validation,
    begin_validation_with_rules,
    validate_sync,
    validate_sync_with_rules,
    validate_with,
};

pub use batch::validate_batch;
