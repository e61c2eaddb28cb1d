#![warn(missing_docs)]

//! Subdivision of cubic patches, triangles and vertices.
//!
//! Every split reproduces its parent exactly (up to rounding) on the
//! corresponding sub-domain. Shared edges are bisected symmetrically, so
//! two neighbouring elements split independently still produce
//! bit-identical child edges and the subdivided surface stays watertight.

pub mod curve;
pub mod patch;
pub mod triangle;
pub mod vertex;

use patchwork_math::Point3;
use patchwork_patch::{Patch, PatchKind};

pub use curve::{midcoord, midpoint, split_cubic_curve, SL, SR};
pub use patch::{bottom_patch, left_patch, right_patch, split_cubic_patch, top_patch, Grid};
pub use triangle::{
    permute_cubic_triangle, quarter_cubic_triangle, quarter_planar_triangle, split_cubic_triangle,
};
pub use vertex::{quarter_cubic_vertex, VertexQuarters};

/// Point `index` of a fixed-size control buffer.
#[inline]
pub(crate) fn point_at(coords: &[f64], index: usize) -> Point3 {
    Point3::new(coords[3 * index], coords[3 * index + 1], coords[3 * index + 2])
}

/// Split any patch into four children covering it.
///
/// Children inherit the parent's tag. Cubic vertices yield two cubic
/// patches followed by two cubic vertices.
pub fn quarter(patch: &Patch) -> [Patch; 4] {
    let c = patch.coords();
    match patch.kind() {
        PatchKind::CubicPatch => {
            let mut grid = [0.0; 48];
            grid.copy_from_slice(c);
            split_cubic_patch(&grid).map(|g| patch.child_cubic_patch(g))
        }
        PatchKind::CubicTriangle => {
            let mut tri = [0.0; 30];
            tri.copy_from_slice(c);
            quarter_cubic_triangle(&tri).map(|t| patch.child_cubic_triangle(t))
        }
        PatchKind::PlanarTriangle => {
            let mut tri = [0.0; 9];
            tri.copy_from_slice(c);
            quarter_planar_triangle(&tri).map(|t| patch.child_planar_triangle(t))
        }
        PatchKind::CubicVertex => {
            let mut vertex = [0.0; 15];
            vertex.copy_from_slice(c);
            let q = quarter_cubic_vertex(&vertex);
            let [p0, p1] = q.patches;
            let [v0, v1] = q.vertices;
            [
                patch.child_cubic_patch(p0),
                patch.child_cubic_patch(p1),
                patch.child_cubic_vertex(v0),
                patch.child_cubic_vertex(v1),
            ]
        }
    }
}
