//! Spatial indexing for ring segments
//!
//! Pairwise segment tests are O(n*m). Rings with many edges are loaded into an
//! R-tree of segment envelopes so only segments with overlapping bounds are
//! compared. Candidate lists are always returned in ascending edge order, which
//! keeps results identical to the brute-force scan.

use rstar::{RTree, RTreeObject, AABB};

use super::types::Segment;

/// Segment wrapper for R-tree spatial indexing
#[derive(Clone, Debug)]
pub struct IndexedSegment {
    /// Position of the segment within its ring's edge list
    pub index: usize,
    pub bounds: AABB<[f64; 2]>,
}

impl IndexedSegment {
    pub fn new(index: usize, segment: &Segment) -> Self {
        Self {
            index,
            bounds: segment_envelope(segment),
        }
    }
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

fn segment_envelope(segment: &Segment) -> AABB<[f64; 2]> {
    let b = segment.bounds();
    AABB::from_corners([b[0], b[1]], [b[2], b[3]])
}

/// The edges of one ring, optionally backed by an R-tree
#[derive(Clone, Debug)]
pub struct SegmentSet {
    segments: Vec<Segment>,
    index: Option<RTree<IndexedSegment>>,
}

impl SegmentSet {
    /// Wrap `segments`, building an R-tree once there are at least
    /// `index_threshold` of them
    pub fn new(segments: Vec<Segment>, index_threshold: usize) -> Self {
        let index = (segments.len() >= index_threshold).then(|| {
            RTree::bulk_load(
                segments
                    .iter()
                    .enumerate()
                    .map(|(i, s)| IndexedSegment::new(i, s))
                    .collect(),
            )
        });
        Self { segments, index }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Indices of segments that may touch `query`, ascending
    ///
    /// Without an index every segment is a candidate.
    pub fn candidates(&self, query: &Segment) -> Vec<usize> {
        match &self.index {
            Some(tree) => {
                let mut hits: Vec<usize> = tree
                    .locate_in_envelope_intersecting(&segment_envelope(query))
                    .map(|s| s.index)
                    .collect();
                // R-tree traversal order is not stable
                hits.sort_unstable();
                hits
            }
            None => (0..self.segments.len()).collect(),
        }
    }
}
