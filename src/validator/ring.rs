//! Ring-local checks
//!
//! Point count, closure, duplicate nodes and self-intersection for one ring.
//! A defect in one ring never stops checks on its siblings.

use std::collections::HashSet;
use std::fmt;

use crate::geometry::{Point, Ring};

use super::reporter::{checkpoint, Reporter, Step};
use super::segment::{folds_back, segment_contact, PreparedRing};
use super::types::{ErrorKind, ValidationError, ValidationRules};

/// How a ring is interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RingRole {
    Line,
    Shell,
    Hole,
}

impl RingRole {
    fn is_closed_boundary(&self) -> bool {
        !matches!(self, RingRole::Line)
    }

    fn min_points(&self) -> (usize, &'static str) {
        match self {
            RingRole::Line => (2, "two"),
            RingRole::Shell | RingRole::Hole => (4, "four"),
        }
    }

    /// Distinct vertices needed once repeats and the closing point are dropped
    fn min_distinct(&self) -> (usize, &'static str) {
        match self {
            RingRole::Line => (2, "two"),
            RingRole::Shell | RingRole::Hole => (3, "three"),
        }
    }
}

/// Position of a ring inside its geometry, used in messages
#[derive(Clone, Copy, Debug)]
pub(crate) struct RingId {
    pub part: usize,
    pub ring: usize,
    pub role: RingRole,
}

impl RingId {
    pub fn new(part: usize, ring: usize, role: RingRole) -> Self {
        Self { part, ring, role }
    }
}

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            RingRole::Line => write!(f, "line {}", self.part),
            RingRole::Shell | RingRole::Hole => write!(f, "ring {} of part {}", self.ring, self.part),
        }
    }
}

/// Run all ring-local checks
///
/// Returns the de-duplicated ring prepared for cross-ring checks, or `None`
/// when the ring has too few points to take part in them.
pub(crate) fn check_ring<R: Reporter + ?Sized>(
    reporter: &mut R,
    ring: &Ring,
    id: RingId,
    rules: &ValidationRules,
) -> Step<Option<PreparedRing>> {
    let (min_points, min_words) = id.role.min_points();
    if ring.len() < min_points {
        let message = format!("{} has fewer than {} points", id, min_words);
        let error = match ring.points.first() {
            Some(p) => ValidationError::at(ErrorKind::TooFewPoints, message, *p),
            None => ValidationError::new(ErrorKind::TooFewPoints, message),
        };
        reporter.report(error);
        return Ok(None);
    }

    let closed = id.role.is_closed_boundary();
    if closed && !ring.is_closed() {
        reporter.report(ValidationError::at(
            ErrorKind::RingNotClosed,
            format!("{} is not closed", id),
            ring.points[0],
        ));
    }

    let points = collapse_duplicate_nodes(reporter, &ring.points, id);
    let (min_distinct, distinct_words) = id.role.min_distinct();
    if distinct_count(&points, closed) < min_distinct {
        reporter.report(ValidationError::at(
            ErrorKind::TooFewPoints,
            format!("{} has fewer than {} distinct points", id, distinct_words),
            points[0],
        ));
        return Ok(None);
    }

    let prepared = PreparedRing::new(points, closed, rules.spatial_index_threshold);
    check_self_intersections(reporter, &prepared, id, closed)?;
    Ok(Some(prepared))
}

/// Vertices left after collapsing repeats, not counting a closing point
fn distinct_count(points: &[Point], closed: bool) -> usize {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if closed && points.len() > 1 && first.same_xy(last) => points.len() - 1,
        _ => points.len(),
    }
}

/// Report each run of identical consecutive points once and return the ring
/// without the repeats
fn collapse_duplicate_nodes<R: Reporter + ?Sized>(
    reporter: &mut R,
    points: &[Point],
    id: RingId,
) -> Vec<Point> {
    let mut unique = Vec::with_capacity(points.len());
    let mut i = 0;
    while i < points.len() {
        let p = points[i];
        let mut j = i + 1;
        while j < points.len() && points[j].same_xy(&p) {
            j += 1;
        }
        let duplicates = j - i - 1;
        if duplicates > 0 {
            let noun = if duplicates == 1 { "node" } else { "nodes" };
            reporter.report(ValidationError::at(
                ErrorKind::DuplicateNode,
                format!("{} contains {} duplicate {} at {}", id, duplicates, noun, p),
                p,
            ));
        }
        unique.push(p);
        i = j;
    }
    unique
}

/// Pairwise test of edges
///
/// Non-adjacent edges may not touch at all, endpoints included. Adjacent edges
/// share a vertex and are only flagged when the second one doubles back along
/// the first. The first and last edge share the closing vertex when the ring
/// is closed, explicitly or implicitly, and count as adjacent. Several edge
/// pairs meeting at one point are reported once.
fn check_self_intersections<R: Reporter + ?Sized>(
    reporter: &mut R,
    ring: &PreparedRing,
    id: RingId,
    closed: bool,
) -> Step {
    let segments = ring.edges.segments();
    let n = segments.len();
    let wraps = n > 2
        && (closed || matches!((ring.points.first(), ring.points.last()), (Some(f), Some(l)) if f.same_xy(l)));
    let mut reported: HashSet<(u64, u64)> = HashSet::new();
    let mut emit = |reporter: &mut R, i: usize, j: usize, p: Point, verb: &str| {
        // +0.0 folds -0.0 into 0.0
        if reported.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())) {
            reporter.report(ValidationError::at(
                ErrorKind::SelfIntersection,
                format!("segments {} and {} of {} {} at {}", i, j, id, verb, p),
                p,
            ));
        }
    };

    for (i, a) in segments.iter().enumerate() {
        checkpoint(reporter)?;
        if i + 1 < n && folds_back(a, &segments[i + 1]) {
            emit(&mut *reporter, i, i + 1, a.end, "fold back");
        } else if wraps && i + 1 == n && folds_back(a, &segments[0]) {
            emit(&mut *reporter, 0, i, a.end, "fold back");
        }
        for j in ring.edges.candidates(a) {
            if j <= i + 1 || (wraps && i == 0 && j == n - 1) {
                continue;
            }
            if let Some(p) = segment_contact(a, &segments[j]) {
                emit(&mut *reporter, i, j, p, "intersect");
            }
        }
    }
    Ok(())
}
