//! Segment math for validation
//!
//! Line intersection, point-to-line distance, point-in-ring and ring-in-ring
//! tests. Every tolerance decision uses [`EPSILON`].

use crate::geometry::{Point, Segment, SegmentSet, Vector};

/// Tolerance shared by all numeric tests.
///
/// Used as the minimum sine of the angle between two non-parallel lines, as the
/// parametric margin that separates a crossing from touching endpoints, and as
/// the distance under which a point lies on a ring edge. Changing it changes
/// reported error sets.
pub const EPSILON: f64 = 1e-8;

/// Signed perpendicular distance from `point` to the line through `line_point`
/// along `direction`
///
/// Positive on the left of `direction`. `None` for a zero-length direction.
pub fn distance_point_to_line(point: Point, direction: Vector, line_point: Point) -> Option<f64> {
    let length = direction.length();
    if length == 0.0 {
        return None;
    }
    Some(direction.cross(&(point - line_point)) / length)
}

/// Parameters `(t, s)` with `p + t*v == q + s*w`
fn line_parameters(p: Point, v: Vector, q: Point, w: Vector) -> Option<(f64, f64)> {
    let det = v.cross(&w);
    // Relative test: |v x w| = |v||w| sin(angle). Zero-length inputs land here too.
    if det.abs() <= EPSILON * v.length() * w.length() {
        return None;
    }
    let d = q - p;
    Some((d.cross(&w) / det, d.cross(&v) / det))
}

/// Intersection of the lines `p + t*v` and `q + s*w`
///
/// `None` when the lines are parallel or collinear.
pub fn intersect_lines(p: Point, v: Vector, q: Point, w: Vector) -> Option<Point> {
    line_parameters(p, v, q, w).map(|(t, _)| p + v * t)
}

/// Crossing point of two segments
///
/// Only reported when the crossing lies strictly inside both segments, so
/// segments that merely touch at an endpoint do not intersect.
pub fn segment_intersection(a: &Segment, b: &Segment) -> Option<Point> {
    let v = a.direction();
    let (t, s) = line_parameters(a.start, v, b.start, b.direction())?;
    let interior = |k: f64| k > EPSILON && k < 1.0 - EPSILON;
    (interior(t) && interior(s)).then(|| a.start + v * t)
}

/// Any contact between two segments, endpoints included
///
/// Parameters within `[-EPSILON, 1 + EPSILON]` count, so a vertex resting on
/// the other segment is a contact. Collinear segments touch where an endpoint
/// of one lies on the other; the first such endpoint is returned.
pub fn segment_contact(a: &Segment, b: &Segment) -> Option<Point> {
    let v = a.direction();
    match line_parameters(a.start, v, b.start, b.direction()) {
        Some((t, s)) => {
            let within = |k: f64| (-EPSILON..=1.0 + EPSILON).contains(&k);
            (within(t) && within(s)).then(|| a.start + v * t)
        }
        None => [(a.start, b), (a.end, b), (b.start, a), (b.end, a)]
            .into_iter()
            .find(|(p, other)| point_on_segment(*p, other))
            .map(|(p, _)| p),
    }
}

/// Whether `outgoing` doubles back along `incoming` at their shared vertex
///
/// The far end of `outgoing` lies within [`EPSILON`] of the line through
/// `incoming` and the two edges point in opposite directions.
pub fn folds_back(incoming: &Segment, outgoing: &Segment) -> bool {
    let (v, w) = (incoming.direction(), outgoing.direction());
    v.dot(&w) < 0.0
        && distance_point_to_line(outgoing.end, v, incoming.start).map_or(false, |d| d.abs() <= EPSILON)
}

/// Consecutive edges of an open line
pub fn line_segments(points: &[Point]) -> Vec<Segment> {
    points
        .windows(2)
        .map(|w| Segment::new(w[0], w[1]))
        .collect()
}

/// Edges of a ring, adding the closing edge when the ring is open
pub fn ring_segments(points: &[Point]) -> Vec<Segment> {
    let mut segments = line_segments(points);
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if points.len() > 2 && !first.same_xy(last) {
            segments.push(Segment::new(*last, *first));
        }
    }
    segments
}

/// Whether `point` lies on `segment` within [`EPSILON`]
pub fn point_on_segment(point: Point, segment: &Segment) -> bool {
    let [min_x, min_y, max_x, max_y] = segment.bounds();
    if point.x < min_x - EPSILON
        || point.x > max_x + EPSILON
        || point.y < min_y - EPSILON
        || point.y > max_y + EPSILON
    {
        return false;
    }
    match distance_point_to_line(point, segment.direction(), segment.start) {
        Some(d) => d.abs() <= EPSILON,
        None => point.same_xy(&segment.start),
    }
}

fn point_in_edges(edges: &[Segment], vertices: &[Point], point: Point) -> bool {
    if vertices.iter().any(|v| v.same_xy(&point)) {
        return true;
    }
    if edges.iter().any(|e| point_on_segment(point, e)) {
        return true;
    }

    // Crossing-number ray cast towards +x
    let mut inside = false;
    for edge in edges {
        let (a, b) = (edge.start, edge.end);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether `point` is inside or on the implicitly closed `ring`
pub fn point_in_ring(ring: &[Point], point: Point) -> bool {
    point_in_edges(&ring_segments(ring), ring, point)
}

/// A ring with its edges prepared for repeated pairwise tests
#[derive(Clone, Debug)]
pub struct PreparedRing {
    pub points: Vec<Point>,
    pub edges: SegmentSet,
}

impl PreparedRing {
    /// Prepare `points` as a closed ring (`closed`) or an open line
    pub fn new(points: Vec<Point>, closed: bool, index_threshold: usize) -> Self {
        let segments = if closed {
            ring_segments(&points)
        } else {
            line_segments(&points)
        };
        Self {
            edges: SegmentSet::new(segments, index_threshold),
            points,
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point_in_edges(self.edges.segments(), &self.points, point)
    }
}

/// First crossing between an edge of `a` and an edge of `b`, in edge order
pub fn first_crossing(a: &SegmentSet, b: &SegmentSet) -> Option<Point> {
    a.segments().iter().find_map(|seg| {
        b.candidates(seg)
            .into_iter()
            .find_map(|j| segment_intersection(seg, &b.segments()[j]))
    })
}

/// Edge crossing between two prepared rings
pub fn rings_cross(a: &PreparedRing, b: &PreparedRing) -> Option<Point> {
    first_crossing(&a.edges, &b.edges)
}

/// How one ring relates to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Containment {
    /// Every vertex inside or on the outer ring, no crossings
    Inside,
    /// No crossings, but this vertex lies outside
    Outside(Point),
    /// An edge crosses the outer ring here
    Crossing(Point),
}

/// Classify `inner` against `outer`; crossings take precedence
pub fn ring_containment(inner: &PreparedRing, outer: &PreparedRing) -> Containment {
    if let Some(p) = rings_cross(inner, outer) {
        return Containment::Crossing(p);
    }
    match inner.points.iter().find(|v| !outer.contains_point(**v)) {
        Some(v) => Containment::Outside(*v),
        None => Containment::Inside,
    }
}

/// Whether the edges of two implicitly closed rings cross
pub fn rings_intersection(a: &[Point], b: &[Point]) -> Option<Point> {
    rings_cross(
        &PreparedRing::new(a.to_vec(), true, usize::MAX),
        &PreparedRing::new(b.to_vec(), true, usize::MAX),
    )
}

/// `inner` lies inside or on `outer` with no edge crossings
pub fn ring_in_ring(inner: &[Point], outer: &[Point]) -> bool {
    let inner = PreparedRing::new(inner.to_vec(), true, usize::MAX);
    let outer = PreparedRing::new(outer.to_vec(), true, usize::MAX);
    ring_containment(&inner, &outer) == Containment::Inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| pt(x, y)).collect()
    }

    fn square(min: f64, max: f64) -> Vec<Point> {
        pts(&[(min, min), (min, max), (max, max), (max, min), (min, min)])
    }

    #[test]
    fn test_distance_point_to_line_signed() {
        let d = distance_point_to_line(pt(0.0, 1.0), Vector::new(2.0, 0.0), pt(0.0, 0.0)).unwrap();
        assert_relative_eq!(d, 1.0);
        let d = distance_point_to_line(pt(5.0, -3.0), Vector::new(2.0, 0.0), pt(0.0, 0.0)).unwrap();
        assert_relative_eq!(d, -3.0);
        assert!(distance_point_to_line(pt(1.0, 1.0), Vector::new(0.0, 0.0), pt(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_intersect_lines() {
        let p = intersect_lines(pt(0.0, 0.0), Vector::new(1.0, 1.0), pt(0.0, 10.0), Vector::new(1.0, -1.0))
            .unwrap();
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 5.0);
    }

    #[test]
    fn test_intersect_lines_parallel_and_degenerate() {
        assert!(intersect_lines(pt(0.0, 0.0), Vector::new(1.0, 0.0), pt(0.0, 1.0), Vector::new(3.0, 0.0)).is_none());
        assert!(intersect_lines(pt(0.0, 0.0), Vector::new(1.0, 0.0), pt(2.0, 0.0), Vector::new(1.0, 0.0)).is_none());
        assert!(intersect_lines(pt(0.0, 0.0), Vector::new(0.0, 0.0), pt(0.0, 1.0), Vector::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_intersect_lines_scale_invariant() {
        // Tiny but clearly non-parallel segments, as in geographic coordinates
        let p = intersect_lines(
            pt(0.0, 0.0),
            Vector::new(1e-6, 1e-6),
            pt(0.0, 1e-6),
            Vector::new(1e-6, -1e-6),
        );
        assert!(p.is_some());
    }

    #[test]
    fn test_segment_intersection_requires_interior() {
        let a = Segment::new(pt(0.0, 0.0), pt(10.0, 10.0));
        let b = Segment::new(pt(0.0, 10.0), pt(10.0, 0.0));
        let p = segment_intersection(&a, &b).unwrap();
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 5.0);

        // Shared endpoint
        let c = Segment::new(pt(10.0, 10.0), pt(20.0, 0.0));
        assert!(segment_intersection(&a, &c).is_none());

        // T-junction: endpoint of one on the interior of the other
        let d = Segment::new(pt(5.0, 5.0), pt(10.0, 0.0));
        assert!(segment_intersection(&a, &d).is_none());

        // Lines cross beyond the segments
        let e = Segment::new(pt(20.0, 0.0), pt(30.0, -10.0));
        assert!(segment_intersection(&a, &e).is_none());
    }

    #[test]
    fn test_segment_contact_includes_endpoints() {
        let a = Segment::new(pt(0.0, 0.0), pt(10.0, 0.0));

        // Vertex resting on the interior
        let tip = Segment::new(pt(4.0, 10.0), pt(5.0, 0.0));
        let p = segment_contact(&a, &tip).unwrap();
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 0.0);
        assert!(segment_intersection(&a, &tip).is_none());

        // Shared endpoint
        let corner = Segment::new(pt(10.0, 0.0), pt(10.0, 5.0));
        assert_eq!(segment_contact(&a, &corner), Some(pt(10.0, 0.0)));

        // Collinear, touching end to end
        let next = Segment::new(pt(15.0, 0.0), pt(10.0, 0.0));
        assert_eq!(segment_contact(&a, &next), Some(pt(10.0, 0.0)));

        // Parallel and apart, or crossing lines beyond the segments
        assert!(segment_contact(&a, &Segment::new(pt(0.0, 1.0), pt(10.0, 1.0))).is_none());
        assert!(segment_contact(&a, &Segment::new(pt(11.0, 1.0), pt(12.0, -1.0))).is_none());
    }

    #[test]
    fn test_folds_back() {
        let a = Segment::new(pt(0.0, 0.0), pt(10.0, 0.0));
        assert!(folds_back(&a, &Segment::new(pt(10.0, 0.0), pt(4.0, 0.0))));
        assert!(folds_back(&a, &Segment::new(pt(10.0, 0.0), pt(-4.0, 0.0))));
        // Straight on, or a sharp but open turn
        assert!(!folds_back(&a, &Segment::new(pt(10.0, 0.0), pt(20.0, 0.0))));
        assert!(!folds_back(&a, &Segment::new(pt(10.0, 0.0), pt(0.0, 0.1))));
    }

    #[test]
    fn test_ring_segments_closes_open_ring() {
        let open = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let segments = ring_segments(&open);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], Segment::new(pt(1.0, 1.0), pt(0.0, 0.0)));
        assert_eq!(ring_segments(&square(0.0, 1.0)).len(), 4);
        assert_eq!(line_segments(&open).len(), 2);
    }

    #[test]
    fn test_point_in_ring() {
        let ring = square(0.0, 10.0);
        assert!(point_in_ring(&ring, pt(5.0, 5.0)));
        assert!(!point_in_ring(&ring, pt(15.0, 5.0)));
        assert!(!point_in_ring(&ring, pt(-1.0, -1.0)));
    }

    #[test]
    fn test_point_on_boundary_counts_as_inside() {
        let ring = square(0.0, 10.0);
        assert!(point_in_ring(&ring, pt(0.0, 5.0)));
        assert!(point_in_ring(&ring, pt(10.0, 10.0)));
        assert!(point_in_ring(&ring, pt(5.0, 0.0)));
        assert!(!point_in_ring(&ring, pt(5.0, -0.001)));
    }

    #[test]
    fn test_point_in_open_ring_uses_implicit_closure() {
        let open = pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert!(point_in_ring(&open, pt(5.0, 5.0)));
        assert!(point_in_ring(&open, pt(5.0, 0.0)));
    }

    #[test]
    fn test_ring_in_ring() {
        assert!(ring_in_ring(&square(2.0, 8.0), &square(0.0, 10.0)));
        assert!(!ring_in_ring(&square(0.0, 10.0), &square(2.0, 8.0)));
        assert!(ring_in_ring(&square(0.0, 10.0), &square(0.0, 10.0)));
    }

    #[test]
    fn test_ring_in_ring_detects_edge_leaving_concave_ring() {
        // U shape: the inner ring's vertices sit in both arms, its edges cross the gap
        let outer = pts(&[
            (0.0, 0.0),
            (30.0, 0.0),
            (30.0, 30.0),
            (20.0, 30.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 30.0),
            (0.0, 30.0),
            (0.0, 0.0),
        ]);
        let inner = pts(&[(5.0, 20.0), (25.0, 20.0), (25.0, 25.0), (5.0, 25.0), (5.0, 20.0)]);
        assert!(inner.iter().all(|v| point_in_ring(&outer, *v)));
        assert!(!ring_in_ring(&inner, &outer));

        let inner = PreparedRing::new(inner, true, usize::MAX);
        let outer = PreparedRing::new(outer, true, usize::MAX);
        match ring_containment(&inner, &outer) {
            Containment::Crossing(p) => {
                assert_relative_eq!(p.x, 10.0);
                assert_relative_eq!(p.y, 20.0);
            }
            other => panic!("expected crossing, got {:?}", other),
        }
    }

    #[test]
    fn test_ring_containment_outside_reports_vertex() {
        let inner = PreparedRing::new(square(20.0, 30.0), true, usize::MAX);
        let outer = PreparedRing::new(square(0.0, 10.0), true, usize::MAX);
        assert_eq!(ring_containment(&inner, &outer), Containment::Outside(pt(20.0, 20.0)));
    }

    #[test]
    fn test_rings_intersection() {
        let a = square(0.0, 10.0);
        let b = square(5.0, 15.0);
        let p = rings_intersection(&a, &b).unwrap();
        assert!(point_in_ring(&a, p) && point_in_ring(&b, p));
        assert!(rings_intersection(&a, &square(20.0, 30.0)).is_none());
        // Touching corners do not cross
        assert!(rings_intersection(&a, &square(10.0, 20.0)).is_none());
    }

    #[test]
    fn test_indexed_and_brute_force_crossings_agree() {
        let zigzag: Vec<Point> = (0..200)
            .map(|i| pt(i as f64, if i % 2 == 0 { 0.0 } else { 10.0 }))
            .collect();
        let bar = pts(&[(-1.0, 5.0), (201.0, 5.0), (201.0, 6.0), (-1.0, 6.0), (-1.0, 5.0)]);
        let brute = first_crossing(
            &PreparedRing::new(zigzag.clone(), false, usize::MAX).edges,
            &PreparedRing::new(bar.clone(), true, usize::MAX).edges,
        );
        let indexed = first_crossing(
            &PreparedRing::new(zigzag, false, 1).edges,
            &PreparedRing::new(bar, true, 1).edges,
        );
        assert!(brute.is_some());
        assert_eq!(brute, indexed);
    }
}
