//! Geometry model for validation
//!
//! # Submodules
//! - `types` - Points, rings, parts and geometries
//! - `spatial` - R-tree indexing of ring segments

mod spatial;
mod types;

pub use types::{Geometry, GeometryKind, Part, Point, Ring, Segment, Vector};

pub use spatial::{IndexedSegment, SegmentSet};
