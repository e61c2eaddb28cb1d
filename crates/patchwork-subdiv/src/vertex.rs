//! Bisection of cubic vertices.

use patchwork_patch::cubic_vertex_to_patch;

use crate::patch::{average, bottom_patch, left_patch, reflect, right_patch, top_patch, Grid};

/// Flat control-point buffer of a cubic vertex.
pub type Vertex = [f64; 15];

/// Children of a quartered cubic vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexQuarters {
    /// Patches covering `v` in `[0, 0.5]`, for `u` low then high.
    pub patches: [Grid; 2],
    /// Vertices covering `v` in `[0.5, 1]` that keep the original apex.
    pub vertices: [Vertex; 2],
}

/// Split a cubic vertex into two patches along its curve and two smaller
/// vertices sharing its apex.
pub fn quarter_cubic_vertex(coords: &Vertex) -> VertexQuarters {
    let tp = cubic_vertex_to_patch(coords);
    let tpr = reflect(&tp);
    let low = average(&left_patch(&bottom_patch(&tp)), &reflect(&right_patch(&top_patch(&tpr))));
    let high = average(&right_patch(&bottom_patch(&tp)), &reflect(&left_patch(&top_patch(&tpr))));
    let tip = |g: &Grid| -> Vertex {
        let mut v = [0.0; 15];
        v[..12].copy_from_slice(&g[36..48]);
        v[12..].copy_from_slice(&coords[12..15]);
        v
    };
    VertexQuarters {
        vertices: [tip(&low), tip(&high)],
        patches: [low, high],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_at;
    use patchwork_math::Point3;
    use patchwork_patch::{evaluate, PatchKind};

    /// Curve with `x = u`, `y = 0`, apex at `(0.5, 1, 2)`; a surface point
    /// gives back `v = y` and `u = (x - 0.5 v) / (1 - v)`.
    fn fan() -> Vertex {
        [
            0.0, 0.0, 0.0, //
            1.0 / 3.0, 0.0, 0.7, //
            2.0 / 3.0, 0.0, -0.4, //
            1.0, 0.0, 0.1, //
            0.5, 1.0, 2.0,
        ]
    }

    fn assert_on_parent(kind: PatchKind, child: &[f64]) {
        let parent = fan();
        for &(u, v) in &[(0.0, 0.0), (1.0, 0.0), (0.3, 0.4), (0.8, 0.7), (0.5, 0.95)] {
            let p = evaluate(kind, child, u, v);
            let pv = p.y;
            let pu = (p.x - 0.5 * pv) / (1.0 - pv);
            let q = evaluate(PatchKind::CubicVertex, &parent, pu, pv);
            assert!((p - q).norm() < 1e-10, "{kind} ({u}, {v})");
        }
    }

    #[test]
    fn test_quarters_reproduce_parent() {
        let q = quarter_cubic_vertex(&fan());
        for g in &q.patches {
            assert_on_parent(PatchKind::CubicPatch, g);
        }
        for v in &q.vertices {
            assert_on_parent(PatchKind::CubicVertex, v);
            assert_eq!(point_at(v, 4), Point3::new(0.5, 1.0, 2.0));
        }
    }

    #[test]
    fn test_tips_continue_patches() {
        let q = quarter_cubic_vertex(&fan());
        for k in 0..2 {
            for i in 0..4 {
                assert_eq!(point_at(&q.vertices[k], i), point_at(&q.patches[k], 12 + i));
            }
        }
        // siblings meet at u = 0.5
        assert_eq!(point_at(&q.patches[0], 3), point_at(&q.patches[1], 0));
    }
}
