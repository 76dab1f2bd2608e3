//! Cross-ring checks
//!
//! Holes against their shell, holes against each other, and shells of
//! different polygon parts against each other. Rings that failed the minimum
//! point count arrive as `None` and are skipped.

use super::reporter::{checkpoint, Reporter, Step};
use super::segment::{ring_containment, rings_cross, Containment, PreparedRing};
use super::types::{ErrorKind, ValidationError, ValidationRules};

/// Prepared rings of one polygon part; index 0 is the shell
pub(crate) type PreparedPart = Vec<Option<PreparedRing>>;

/// Containment of every hole in the shell, then every pair of holes
pub(crate) fn check_part<R: Reporter + ?Sized>(
    reporter: &mut R,
    part_idx: usize,
    rings: &[Option<PreparedRing>],
) -> Step {
    let Some((shell, holes)) = rings.split_first() else {
        return Ok(());
    };

    for (h, hole) in holes.iter().enumerate() {
        checkpoint(reporter)?;
        let (Some(shell), Some(hole)) = (shell, hole) else {
            continue;
        };
        let ring_idx = h + 1;
        match ring_containment(hole, shell) {
            Containment::Inside => {}
            Containment::Crossing(p) => reporter.report(ValidationError::at(
                ErrorKind::HoleIntersectsShell,
                format!("ring {} of part {} crosses the shell at {}", ring_idx, part_idx, p),
                p,
            )),
            Containment::Outside(v) => reporter.report(ValidationError::at(
                ErrorKind::HoleOutsideShell,
                format!("ring {} of part {} is not inside the shell", ring_idx, part_idx),
                v,
            )),
        }
    }

    for i in 0..holes.len() {
        for j in (i + 1)..holes.len() {
            checkpoint(reporter)?;
            let (Some(a), Some(b)) = (&holes[i], &holes[j]) else {
                continue;
            };
            if let Some(p) = rings_cross(a, b) {
                reporter.report(ValidationError::at(
                    ErrorKind::HolesIntersectEachOther,
                    format!("rings {} and {} of part {} intersect at {}", i + 1, j + 1, part_idx, p),
                    p,
                ));
            }
        }
    }

    Ok(())
}

/// Shell of `candidate` lies in `part`'s shell and not in one of its holes
fn lies_in_part(candidate: &PreparedRing, part: &[Option<PreparedRing>]) -> bool {
    let Some(Some(shell)) = part.first() else {
        return false;
    };
    ring_containment(candidate, shell) == Containment::Inside
        && !part[1..]
            .iter()
            .flatten()
            .any(|hole| ring_containment(candidate, hole) == Containment::Inside)
}

/// Pairwise checks between the shells of different parts
///
/// Holes of different parts are not compared.
pub(crate) fn check_parts<R: Reporter + ?Sized>(
    reporter: &mut R,
    parts: &[PreparedPart],
    rules: &ValidationRules,
) -> Step {
    for i in 0..parts.len() {
        for j in (i + 1)..parts.len() {
            checkpoint(reporter)?;
            let (Some(Some(a)), Some(Some(b))) = (parts[i].first(), parts[j].first()) else {
                continue;
            };

            if let Some(p) = rings_cross(a, b) {
                reporter.report(ValidationError::at(
                    ErrorKind::RingIntersectsAnotherPart,
                    format!("shells of parts {} and {} intersect at {}", i, j, p),
                    p,
                ));
                continue;
            }

            if !rules.check_part_nesting {
                continue;
            }
            let nested = if lies_in_part(b, &parts[i]) {
                Some((j, i, b))
            } else if lies_in_part(a, &parts[j]) {
                Some((i, j, a))
            } else {
                None
            };
            if let Some((inner, outer, shell)) = nested {
                let message = format!("part {} lies inside part {}", inner, outer);
                let error = match shell.points.first() {
                    Some(p) => ValidationError::at(ErrorKind::PartInsideAnotherPart, message, *p),
                    None => ValidationError::new(ErrorKind::PartInsideAnotherPart, message),
                };
                reporter.report(error);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::validator::reporter::CollectingReporter;

    fn square(x: f64, y: f64, size: f64) -> Option<PreparedRing> {
        let points = [(x, y), (x, y + size), (x + size, y + size), (x + size, y), (x, y)]
            .iter()
            .map(|&(px, py)| Point::new(px, py))
            .collect();
        Some(PreparedRing::new(points, true, usize::MAX))
    }

    fn part_kinds(rings: &[Option<PreparedRing>]) -> Vec<ErrorKind> {
        let mut reporter = CollectingReporter::new();
        check_part(&mut reporter, 0, rings).unwrap();
        reporter.errors().iter().map(|e| e.kind).collect()
    }

    fn parts_kinds(parts: &[PreparedPart], rules: &ValidationRules) -> Vec<ErrorKind> {
        let mut reporter = CollectingReporter::new();
        check_parts(&mut reporter, parts, rules).unwrap();
        reporter.errors().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_hole_inside_shell() {
        assert!(part_kinds(&[square(0.0, 0.0, 10.0), square(2.0, 2.0, 2.0)]).is_empty());
    }

    #[test]
    fn test_hole_outside_shell() {
        let kinds = part_kinds(&[square(0.0, 0.0, 10.0), square(20.0, 20.0, 2.0)]);
        assert_eq!(kinds, vec![ErrorKind::HoleOutsideShell]);
    }

    #[test]
    fn test_hole_crossing_shell() {
        let kinds = part_kinds(&[square(0.0, 0.0, 10.0), square(8.0, 2.0, 4.0)]);
        assert_eq!(kinds, vec![ErrorKind::HoleIntersectsShell]);
    }

    #[test]
    fn test_intersecting_holes() {
        let kinds = part_kinds(&[
            square(0.0, 0.0, 10.0),
            square(1.0, 1.0, 4.0),
            square(3.0, 3.0, 4.0),
            square(8.0, 8.0, 1.0),
        ]);
        assert_eq!(kinds, vec![ErrorKind::HolesIntersectEachOther]);
    }

    #[test]
    fn test_skipped_rings_are_ignored() {
        assert!(part_kinds(&[None, square(20.0, 20.0, 2.0)]).is_empty());
        assert!(part_kinds(&[square(0.0, 0.0, 10.0), None, square(1.0, 1.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_overlapping_parts() {
        let parts = vec![vec![square(0.0, 0.0, 10.0)], vec![square(5.0, 5.0, 10.0)]];
        assert_eq!(
            parts_kinds(&parts, &ValidationRules::default()),
            vec![ErrorKind::RingIntersectsAnotherPart]
        );
    }

    #[test]
    fn test_disjoint_and_touching_parts() {
        let parts = vec![
            vec![square(0.0, 0.0, 10.0)],
            vec![square(10.0, 0.0, 10.0)],
            vec![square(30.0, 0.0, 1.0)],
        ];
        assert!(parts_kinds(&parts, &ValidationRules::default()).is_empty());
    }

    #[test]
    fn test_nested_part() {
        let parts = vec![vec![square(2.0, 2.0, 2.0)], vec![square(0.0, 0.0, 10.0)]];
        let mut reporter = CollectingReporter::new();
        check_parts(&mut reporter, &parts, &ValidationRules::default()).unwrap();
        assert_eq!(reporter.errors().len(), 1);
        assert_eq!(reporter.errors()[0].kind, ErrorKind::PartInsideAnotherPart);
        assert_eq!(reporter.errors()[0].message, "part 0 lies inside part 1");

        let rules = ValidationRules {
            check_part_nesting: false,
            ..ValidationRules::default()
        };
        assert!(parts_kinds(&parts, &rules).is_empty());
    }

    #[test]
    fn test_island_in_hole_is_valid() {
        let parts = vec![
            vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 6.0)],
            vec![square(4.0, 4.0, 2.0)],
        ];
        assert!(parts_kinds(&parts, &ValidationRules::default()).is_empty());
    }

    #[test]
    fn test_holes_of_different_parts_not_compared() {
        let parts = vec![
            vec![square(0.0, 0.0, 10.0), square(1.0, 1.0, 8.0)],
            vec![square(20.0, 0.0, 10.0), square(21.0, 1.0, 8.0)],
        ];
        assert!(parts_kinds(&parts, &ValidationRules::default()).is_empty());
    }
}
