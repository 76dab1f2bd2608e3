//! Core geometry types consumed by the validator
//!
//! A geometry is an ordered list of parts, a part is an ordered list of rings
//! and a ring is an ordered list of points. For polygon geometries ring 0 of a
//! part is the shell and the remaining rings are holes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::error::ValidatorError;

/// A 2D point with optional z and m values
///
/// z and m are carried through but never take part in planar checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None, m: None }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_m(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }

    /// Exact planar equality (no tolerance, z/m ignored)
    pub fn same_xy(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// All present coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.map_or(true, f64::is_finite)
            && self.m.map_or(true, f64::is_finite)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A planar direction vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// z component of the 3D cross product
    pub fn cross(&self, other: &Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Counter-clockwise perpendicular
    pub fn perp(&self) -> Vector {
        Vector::new(-self.y, self.x)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, k: f64) -> Vector {
        Vector::new(self.x * k, self.y * k)
    }
}

/// A directed line segment between two ring vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    /// Axis-aligned bounds as [min_x, min_y, max_x, max_y]
    pub fn bounds(&self) -> [f64; 4] {
        [
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        ]
    }
}

/// Geometry type, decides how the rings of a part are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

/// Ordered sequence of points forming a line or polygon boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    pub points: Vec<Point>,
}

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build a ring from planar coordinate pairs
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point equals last point (exact planar equality)
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => first.same_xy(last),
            _ => false,
        }
    }
}

/// One shell plus holes (polygon) or a single ring (line, point)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub rings: Vec<Ring>,
}

impl Part {
    /// Polygon part with a shell and zero or more holes
    pub fn polygon(shell: Ring, holes: Vec<Ring>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(shell);
        rings.extend(holes);
        Self { rings }
    }

    /// Line or point part holding exactly one ring
    pub fn single(ring: Ring) -> Self {
        Self { rings: vec![ring] }
    }

    pub fn shell(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

/// Immutable geometry snapshot handed to the validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub kind: GeometryKind,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Geometry {
    pub fn new(kind: GeometryKind, parts: Vec<Part>) -> Self {
        Self { kind, parts }
    }

    pub fn polygon(parts: Vec<Part>) -> Self {
        Self::new(GeometryKind::Polygon, parts)
    }

    /// Single-part polygon without holes
    pub fn simple_polygon(shell: Ring) -> Self {
        Self::polygon(vec![Part::polygon(shell, Vec::new())])
    }

    pub fn line(lines: Vec<Ring>) -> Self {
        Self::new(GeometryKind::Line, lines.into_iter().map(Part::single).collect())
    }

    pub fn points(points: Vec<Point>) -> Self {
        Self::new(
            GeometryKind::Point,
            points
                .into_iter()
                .map(|p| Part::single(Ring::new(vec![p])))
                .collect(),
        )
    }

    /// Total vertex count across all rings
    pub fn vertex_count(&self) -> usize {
        self.parts
            .iter()
            .flat_map(|p| p.rings.iter())
            .map(Ring::len)
            .sum()
    }

    /// Reject input the validator cannot interpret
    ///
    /// These are caller errors, not geometry defects: a part without rings, a
    /// line or point part with more than one ring, or a non-finite coordinate.
    pub fn ensure_well_formed(&self) -> Result<(), ValidatorError> {
        for (part_idx, part) in self.parts.iter().enumerate() {
            if part.rings.is_empty() {
                return Err(ValidatorError::EmptyPart { part: part_idx });
            }
            if self.kind != GeometryKind::Polygon && part.rings.len() > 1 {
                return Err(ValidatorError::TooManyRings {
                    part: part_idx,
                    rings: part.rings.len(),
                });
            }
            for (ring_idx, ring) in part.rings.iter().enumerate() {
                if let Some(vertex) = ring.points.iter().position(|p| !p.is_finite()) {
                    return Err(ValidatorError::NonFiniteCoordinate {
                        part: part_idx,
                        ring: ring_idx,
                        vertex,
                    });
                }
            }
        }
        Ok(())
    }
}
