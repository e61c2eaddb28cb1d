//! Flatness heuristic for the reduced-order integration mode.

use patchwork_math::Point3;

use crate::buf::point_at;
use crate::elevate::cubic_vertex_to_patch;
use crate::PatchKind;

const PATCH_CURVES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [3, 7, 11, 15],
    [15, 14, 13, 12],
    [12, 8, 4, 0],
    [0, 5, 10, 15],
    [3, 6, 9, 12],
];
const TRIANGLE_CURVES: [[usize; 4]; 3] = [[0, 4, 7, 9], [9, 8, 6, 3], [3, 2, 1, 0]];

/// True if the control net is close to a flat, evenly spaced one.
///
/// Checks every boundary curve and both diagonals of a patch net: each
/// control leg must be about a third of its chord (within `limit`), lean
/// away from the chord by an angle whose tangent is at most `limit`, and
/// not point backwards. Triangles additionally bound the offset of the
/// center point from the corner centroid by `limit` times the perimeter.
///
/// Planar triangles always return `false`; they are integrated exactly.
pub fn nearly_flat(kind: PatchKind, coords: &[f64], limit: f64) -> bool {
    match kind {
        PatchKind::PlanarTriangle => false,
        PatchKind::CubicPatch => curves_flat(coords, &PATCH_CURVES, limit),
        PatchKind::CubicVertex => {
            let patch = cubic_vertex_to_patch(coords);
            curves_flat(&patch, &PATCH_CURVES, limit)
        }
        PatchKind::CubicTriangle => {
            if !curves_flat(coords, &TRIANGLE_CURVES, limit) {
                return false;
            }
            let (a, b, c) = (point_at(coords, 0), point_at(coords, 3), point_at(coords, 9));
            let perimeter = (b - a).norm() + (c - b).norm() + (a - c).norm();
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            let offset = (point_at(coords, 5).coords - centroid).norm();
            offset <= limit * perimeter
        }
    }
}

fn curves_flat(coords: &[f64], curves: &[[usize; 4]], limit: f64) -> bool {
    curves.iter().all(|idx| {
        let p = idx.map(|i| point_at(coords, i));
        leg_ok(&p[0], &p[1], &p[3], limit) && leg_ok(&p[3], &p[2], &p[0], limit)
    })
}

/// Test the leg `from -> inner` against the chord `from -> to`.
fn leg_ok(from: &Point3, inner: &Point3, to: &Point3, limit: f64) -> bool {
    let chord = to - from;
    let leg = inner - from;
    let chord_len = chord.norm();
    if chord_len == 0.0 {
        // collapsed curve, e.g. a pole row
        return leg.norm() == 0.0;
    }
    let dot = chord.dot(&leg);
    if dot < 0.0 {
        return false;
    }
    if (leg.norm() / chord_len - 1.0 / 3.0).abs() > limit {
        return false;
    }
    chord.cross(&leg).norm() <= limit * dot
}
