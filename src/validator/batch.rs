//! Parallel validation of independent geometries

use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

use crate::error::Result;
use crate::geometry::Geometry;

use super::runners::validate_sync_with_rules;
use super::types::{ValidationError, ValidationRules};

/// Validate each geometry on the rayon pool
///
/// Each geometry is still checked sequentially; results come back in input
/// order, one `Result` per geometry.
pub fn validate_batch(geometries: &[Geometry], rules: &ValidationRules) -> Vec<Result<Vec<ValidationError>>> {
    let start = Instant::now();

    let results: Vec<Result<Vec<ValidationError>>> = geometries
        .par_iter()
        .map(|geometry| validate_sync_with_rules(geometry, rules))
        .collect();

    let error_count: usize = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(Vec::len)
        .sum();
    let rejected = results.iter().filter(|r| r.is_err()).count();

    info!(
        "[Validator] Batch completed: {} geometries checked, {} rejected, {} errors found in {:?}",
        geometries.len(),
        rejected,
        error_count,
        start.elapsed()
    );

    results
}
