//! Geometry walk shared by every entry point
//!
//! Parts are visited in order, rings in order within a part. Ring-local
//! defects of a part are reported before its cross-ring defects, and
//! cross-part defects come last. The same input always yields the same
//! sequence.

use crate::geometry::{Geometry, GeometryKind};

use super::cross::{self, PreparedPart};
use super::reporter::{checkpoint, Reporter, Step};
use super::ring::{check_ring, RingId, RingRole};
use super::types::ValidationRules;

/// How a walk ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Completed,
    Cancelled,
}

/// Run every check on `geometry`, pushing defects into `reporter`
///
/// Point geometries have nothing to check.
pub fn run_checks<R: Reporter + ?Sized>(
    geometry: &Geometry,
    rules: &ValidationRules,
    reporter: &mut R,
) -> CheckOutcome {
    let result = match geometry.kind {
        GeometryKind::Point => Ok(()),
        GeometryKind::Line => check_lines(geometry, rules, reporter),
        GeometryKind::Polygon => check_polygons(geometry, rules, reporter),
    };
    match result {
        Ok(()) => CheckOutcome::Completed,
        Err(_) => CheckOutcome::Cancelled,
    }
}

fn check_lines<R: Reporter + ?Sized>(
    geometry: &Geometry,
    rules: &ValidationRules,
    reporter: &mut R,
) -> Step {
    for (part_idx, part) in geometry.parts.iter().enumerate() {
        for (ring_idx, ring) in part.rings.iter().enumerate() {
            checkpoint(reporter)?;
            check_ring(reporter, ring, RingId::new(part_idx, ring_idx, RingRole::Line), rules)?;
        }
    }
    Ok(())
}

fn check_polygons<R: Reporter + ?Sized>(
    geometry: &Geometry,
    rules: &ValidationRules,
    reporter: &mut R,
) -> Step {
    let mut prepared_parts: Vec<PreparedPart> = Vec::with_capacity(geometry.parts.len());

    for (part_idx, part) in geometry.parts.iter().enumerate() {
        let mut prepared = Vec::with_capacity(part.rings.len());
        for (ring_idx, ring) in part.rings.iter().enumerate() {
            checkpoint(reporter)?;
            let role = if ring_idx == 0 { RingRole::Shell } else { RingRole::Hole };
            prepared.push(check_ring(reporter, ring, RingId::new(part_idx, ring_idx, role), rules)?);
        }
        cross::check_part(reporter, part_idx, &prepared)?;
        prepared_parts.push(prepared);
    }

    cross::check_parts(reporter, &prepared_parts, rules)
}
