//! Canonical boundary edges of a patch.
//!
//! Every edge is a cubic Bezier curve. Straight edges are degree-elevated
//! with [`line_to_cubic`] so that two triangles sharing a side produce
//! exactly reversed control points. Traversal keeps the patch interior on
//! the left when viewed against the normal `tu x tv`.

use patchwork_math::{Point3, Tolerances};

use crate::buf::point_at;
use crate::elevate::line_to_cubic;
use crate::{Patch, PatchKind};

/// One boundary curve of a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Index of the owning patch within its surface.
    pub patch: usize,
    /// Canonical edge number within the patch.
    pub number: usize,
    /// Cubic control points, start to end.
    pub points: [Point3; 4],
    /// True if the edge was elevated from a straight segment.
    pub straight: bool,
}

impl Edge {
    /// First control point.
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    /// Last control point.
    pub fn end(&self) -> Point3 {
        self.points[3]
    }

    /// Cubic control points.
    pub fn control_points(&self) -> &[Point3; 4] {
        &self.points
    }

    /// True if every control point coincides with the start.
    pub fn is_degenerate(&self, tol: &Tolerances) -> bool {
        self.points[1..]
            .iter()
            .all(|p| tol.points_equal(p, &self.points[0]))
    }

    /// The same curve traversed backwards.
    pub fn reversed(&self) -> Edge {
        let [a, b, c, d] = self.points;
        Edge {
            points: [d, c, b, a],
            ..self.clone()
        }
    }

    /// True if `other` is this edge traversed backwards.
    pub fn matches_reversed(&self, other: &Edge, tol: &Tolerances) -> bool {
        (0..4).all(|k| tol.points_equal(&self.points[k], &other.points[3 - k]))
    }

    /// True if `other` runs along this edge in the same direction.
    pub fn matches_forward(&self, other: &Edge, tol: &Tolerances) -> bool {
        (0..4).all(|k| tol.points_equal(&self.points[k], &other.points[k]))
    }
}

const PATCH_EDGES: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 7, 11, 15], [15, 14, 13, 12], [12, 8, 4, 0]];
const TRIANGLE_EDGES: [[usize; 4]; 3] = [[0, 4, 7, 9], [9, 8, 6, 3], [3, 2, 1, 0]];

/// Canonical boundary edges of `patch`, degenerate ones included.
///
/// The returned edges have `patch == 0`; surfaces set the owner index.
pub fn boundary_edges(patch: &Patch) -> Vec<Edge> {
    let c = patch.coords();
    let curve = |number: usize, indices: &[usize; 4]| Edge {
        patch: 0,
        number,
        points: indices.map(|i| point_at(c, i)),
        straight: false,
    };
    let line = |number: usize, a: usize, b: usize| Edge {
        patch: 0,
        number,
        points: line_to_cubic(&point_at(c, a), &point_at(c, b)),
        straight: true,
    };
    match patch.kind() {
        PatchKind::CubicPatch => PATCH_EDGES
            .iter()
            .enumerate()
            .map(|(n, idx)| curve(n, idx))
            .collect(),
        PatchKind::CubicTriangle => TRIANGLE_EDGES
            .iter()
            .enumerate()
            .map(|(n, idx)| curve(n, idx))
            .collect(),
        PatchKind::PlanarTriangle => vec![line(0, 0, 2), line(1, 2, 1), line(2, 1, 0)],
        PatchKind::CubicVertex => vec![
            curve(0, &[0, 1, 2, 3]),
            line(1, 3, 4),
            line(2, 4, 4),
            line(3, 4, 0),
        ],
    }
}
