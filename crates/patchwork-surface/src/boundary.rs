//! Boundary paths assembled from unmatched edges.

use patchwork_math::{Point3, Tolerances};
use patchwork_patch::Edge;

use crate::topology::{cell_size_for, PointGrid};

/// One piece of a boundary subpath.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Straight segment from the first point to the second.
    Line([Point3; 2]),
    /// Cubic Bezier segment.
    Cubic([Point3; 4]),
}

impl Segment {
    /// First point.
    pub fn start(&self) -> Point3 {
        match self {
            Segment::Line(p) => p[0],
            Segment::Cubic(p) => p[0],
        }
    }

    /// Last point.
    pub fn end(&self) -> Point3 {
        match self {
            Segment::Line(p) => p[1],
            Segment::Cubic(p) => p[3],
        }
    }

    fn from_edge(edge: &Edge) -> Self {
        if edge.straight {
            Segment::Line([edge.start(), edge.end()])
        } else {
            Segment::Cubic(edge.points)
        }
    }
}

/// A connected run of boundary segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    /// Start point of the first segment.
    pub start: Point3,
    /// Segments, each starting where the previous one ends.
    pub segments: Vec<Segment>,
    /// True if the last segment ends at `start`.
    pub closed: bool,
}

/// The boundary of a surface as a list of subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryPath {
    /// Open chains first, then closed loops.
    pub subpaths: Vec<Subpath>,
}

impl BoundaryPath {
    /// True if there is no boundary at all.
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Total number of segments over all subpaths.
    pub fn segment_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.segments.len()).sum()
    }
}

/// Chain `edges` head to tail.
///
/// Each edge is followed by the lowest-index unused edge starting at its
/// end. Chains begin at edges no other edge leads into; whatever remains
/// forms closed loops.
pub(crate) fn chain_edges(owned: Vec<Edge>, tol: &Tolerances) -> BoundaryPath {
    let cell = cell_size_for(&owned, tol);
    let mut starts = PointGrid::new(cell);
    let mut ends = PointGrid::new(cell);
    for (i, e) in owned.iter().enumerate() {
        starts.insert(&e.start(), i);
        ends.insert(&e.end(), i);
    }
    let starting_at = |p: &Point3| -> Vec<usize> {
        starts
            .near(p)
            .into_iter()
            .filter(|&j| tol.points_equal(&owned[j].start(), p))
            .collect()
    };

    let has_predecessor: Vec<bool> = owned
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let start = e.start();
            ends.near(&start)
                .into_iter()
                .any(|j| j != i && tol.points_equal(&owned[j].end(), &start))
        })
        .collect();

    let mut used = vec![false; owned.len()];
    let mut path = BoundaryPath::default();
    let walk = |first: usize, used: &mut Vec<bool>| -> Subpath {
        let start = owned[first].start();
        let mut segments = Vec::new();
        let mut current = first;
        loop {
            used[current] = true;
            segments.push(Segment::from_edge(&owned[current]));
            let end = owned[current].end();
            match starting_at(&end).into_iter().find(|&j| !used[j]) {
                Some(next) => current = next,
                None => {
                    let closed = tol.points_equal(&end, &start);
                    return Subpath {
                        start,
                        segments,
                        closed,
                    };
                }
            }
        }
    };

    for first in 0..owned.len() {
        if !used[first] && !has_predecessor[first] {
            path.subpaths.push(walk(first, &mut used));
        }
    }
    for first in 0..owned.len() {
        if !used[first] {
            path.subpaths.push(walk(first, &mut used));
        }
    }
    path
}
