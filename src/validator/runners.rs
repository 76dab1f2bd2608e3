//! Validation entry points
//!
//! - Blocking validation on the caller's thread
//! - Validation into a caller-supplied reporter
//! - Background validation returning a handle

use std::time::Instant;
use tracing::debug;

use crate::error::Result;
use crate::geometry::Geometry;

use super::checks::{run_checks, CheckOutcome};
use super::reporter::{CollectingReporter, Reporter};
use super::run::{ValidationHandle, ValidationRun};
use super::types::{ValidationError, ValidationRules};

/// Run every check to completion and return the defects in emission order
pub fn validate_sync(geometry: &Geometry) -> Result<Vec<ValidationError>> {
    validate_sync_with_rules(geometry, &ValidationRules::default())
}

pub fn validate_sync_with_rules(geometry: &Geometry, rules: &ValidationRules) -> Result<Vec<ValidationError>> {
    let mut reporter = CollectingReporter::new();
    validate_with(geometry, rules, &mut reporter)?;
    Ok(reporter.into_errors())
}

/// Run every check, pushing defects into `reporter` as they are found
///
/// Stops early when the reporter signals cancellation.
pub fn validate_with<R: Reporter + ?Sized>(
    geometry: &Geometry,
    rules: &ValidationRules,
    reporter: &mut R,
) -> Result<CheckOutcome> {
    geometry.ensure_well_formed()?;

    let start = Instant::now();
    let outcome = run_checks(geometry, rules, reporter);
    debug!(
        "[Validator] Sync check {:?}: {} parts, {} vertices in {:?}",
        outcome,
        geometry.parts.len(),
        geometry.vertex_count(),
        start.elapsed()
    );
    Ok(outcome)
}

/// Start a background run with default rules
pub fn begin_validation(geometry: Geometry) -> Result<ValidationHandle> {
    begin_validation_with_rules(geometry, ValidationRules::default())
}

pub fn begin_validation_with_rules(geometry: Geometry, rules: ValidationRules) -> Result<ValidationHandle> {
    ValidationRun::with_rules(geometry, rules)?.start()
}
