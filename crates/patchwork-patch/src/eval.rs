//! Position and tangent evaluation for every patch kind.
//!
//! All functions take a flat coordinate buffer laid out as described on
//! [`PatchKind`]. Parameter values on an edge of the domain take a path
//! that evaluates the edge curve alone, so corners are reproduced exactly
//! and patches sharing an edge evaluate it identically.

use patchwork_math::{Point3, Vec3};

use crate::buf::point_at;
use crate::PatchKind;

/// Index of the cubic-triangle control point `P(i, j, 3 - i - j)`.
#[inline]
pub(crate) fn tri_index(i: usize, j: usize) -> usize {
    const ROW: [usize; 4] = [0, 4, 7, 9];
    ROW[i] + j
}

/// Cubic Bernstein weights at `t`.
#[inline]
pub fn bernstein3(t: f64) -> [f64; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * t * s * s, 3.0 * t * t * s, t * t * t]
}

/// Derivatives of the cubic Bernstein weights at `t`.
#[inline]
pub fn bernstein3_derivative(t: f64) -> [f64; 4] {
    let s = 1.0 - t;
    [
        -3.0 * s * s,
        3.0 * s * s - 6.0 * t * s,
        6.0 * t * s - 3.0 * t * t,
        3.0 * t * t,
    ]
}

/// Point on the cubic Bezier curve with control points `p` at `t`.
pub fn cubic_curve_point(p: &[Point3; 4], t: f64) -> Point3 {
    let b = bernstein3(t);
    Point3::from(p[0].coords * b[0] + p[1].coords * b[1] + p[2].coords * b[2] + p[3].coords * b[3])
}

/// Derivative of the cubic Bezier curve with control points `p` at `t`.
pub fn cubic_curve_derivative(p: &[Point3; 4], t: f64) -> Vec3 {
    let b = bernstein3_derivative(t);
    p[0].coords * b[0] + p[1].coords * b[1] + p[2].coords * b[2] + p[3].coords * b[3]
}

fn curve_at(coords: &[f64], indices: [usize; 4]) -> [Point3; 4] {
    indices.map(|i| point_at(coords, i))
}

// =============================================================================
// Positions
// =============================================================================

/// Surface point at parameters `(u, v)`.
///
/// For triangular kinds `w = 1 - u - v`.
///
/// # Panics
/// Panics if `coords` is shorter than `kind.coord_len()`.
pub fn evaluate(kind: PatchKind, coords: &[f64], u: f64, v: f64) -> Point3 {
    match kind {
        PatchKind::PlanarTriangle => planar_point(coords, u, v, 1.0 - u - v),
        PatchKind::CubicTriangle => triangle_point(coords, u, v, 1.0 - u - v),
        PatchKind::CubicPatch => patch_point(coords, u, v),
        PatchKind::CubicVertex => vertex_point(coords, u, v),
    }
}

/// Surface point at barycentric coordinates `(u, v, w)`.
///
/// The supplied `w` is used as is, so callers holding exact barycentric
/// triples avoid the rounding of `1 - u - v`. Kinds parametrized over the
/// square ignore `w`.
pub fn evaluate_barycentric(kind: PatchKind, coords: &[f64], u: f64, v: f64, w: f64) -> Point3 {
    match kind {
        PatchKind::PlanarTriangle => planar_point(coords, u, v, w),
        PatchKind::CubicTriangle => triangle_point(coords, u, v, w),
        _ => evaluate(kind, coords, u, v),
    }
}

fn planar_point(coords: &[f64], u: f64, v: f64, w: f64) -> Point3 {
    let p0 = point_at(coords, 0);
    let p1 = point_at(coords, 1);
    let p2 = point_at(coords, 2);
    Point3::from(p0.coords * w + p1.coords * v + p2.coords * u)
}

fn triangle_point(coords: &[f64], u: f64, v: f64, w: f64) -> Point3 {
    if u == 0.0 {
        return cubic_curve_point(&curve_at(coords, [0, 1, 2, 3]), v);
    }
    if v == 0.0 {
        return cubic_curve_point(&curve_at(coords, [0, 4, 7, 9]), u);
    }
    if w == 0.0 {
        return cubic_curve_point(&curve_at(coords, [9, 8, 6, 3]), v);
    }
    let pu = [1.0, u, u * u, u * u * u];
    let pv = [1.0, v, v * v, v * v * v];
    let pw = [1.0, w, w * w, w * w * w];
    let mut sum = Vec3::zeros();
    for i in 0..4 {
        for j in 0..4 - i {
            let k = 3 - i - j;
            let weight = 6.0 / (FACTORIAL[i] * FACTORIAL[j] * FACTORIAL[k]) * pu[i] * pv[j] * pw[k];
            sum += point_at(coords, tri_index(i, j)).coords * weight;
        }
    }
    Point3::from(sum)
}

const FACTORIAL: [f64; 4] = [1.0, 1.0, 2.0, 6.0];

fn patch_point(coords: &[f64], u: f64, v: f64) -> Point3 {
    if v == 0.0 {
        return cubic_curve_point(&curve_at(coords, [0, 1, 2, 3]), u);
    }
    if v == 1.0 {
        return cubic_curve_point(&curve_at(coords, [12, 13, 14, 15]), u);
    }
    if u == 0.0 {
        return cubic_curve_point(&curve_at(coords, [0, 4, 8, 12]), v);
    }
    if u == 1.0 {
        return cubic_curve_point(&curve_at(coords, [3, 7, 11, 15]), v);
    }
    Point3::from(patch_sum(coords, &bernstein3(u), &bernstein3(v)))
}

fn vertex_point(coords: &[f64], u: f64, v: f64) -> Point3 {
    let apex = point_at(coords, 4);
    if v == 1.0 {
        return apex;
    }
    let c = cubic_curve_point(&curve_at(coords, [0, 1, 2, 3]), u);
    if v == 0.0 {
        return c;
    }
    Point3::from(c.coords * (1.0 - v) + apex.coords * v)
}

// =============================================================================
// Tangents
// =============================================================================

/// Partial derivative `dP/du` at `(u, v)`.
///
/// For triangles this is the derivative of `P(u, v, 1 - u - v)`.
pub fn u_tangent(kind: PatchKind, coords: &[f64], u: f64, v: f64) -> Vec3 {
    match kind {
        PatchKind::PlanarTriangle => point_at(coords, 2) - point_at(coords, 0),
        PatchKind::CubicTriangle => triangle_derivative(coords, u, v, |i, j| {
            (tri_index(i + 1, j), tri_index(i, j))
        }),
        PatchKind::CubicPatch => {
            let du = bernstein3_derivative(u);
            let bv = bernstein3(v);
            patch_sum(coords, &du, &bv)
        }
        PatchKind::CubicVertex => {
            if v == 1.0 {
                return Vec3::zeros();
            }
            cubic_curve_derivative(&curve_at(coords, [0, 1, 2, 3]), u) * (1.0 - v)
        }
    }
}

/// Partial derivative `dP/dv` at `(u, v)`.
///
/// For triangles this is the derivative of `P(u, v, 1 - u - v)`.
pub fn v_tangent(kind: PatchKind, coords: &[f64], u: f64, v: f64) -> Vec3 {
    match kind {
        PatchKind::PlanarTriangle => point_at(coords, 1) - point_at(coords, 0),
        PatchKind::CubicTriangle => triangle_derivative(coords, u, v, |i, j| {
            (tri_index(i, j + 1), tri_index(i, j))
        }),
        PatchKind::CubicPatch => {
            let bu = bernstein3(u);
            let dv = bernstein3_derivative(v);
            patch_sum(coords, &bu, &dv)
        }
        PatchKind::CubicVertex => {
            let c = cubic_curve_point(&curve_at(coords, [0, 1, 2, 3]), u);
            point_at(coords, 4) - c
        }
    }
}

/// Unnormalized normal `tu x tv`; zero where the patch is degenerate.
pub fn normal(kind: PatchKind, coords: &[f64], u: f64, v: f64) -> Vec3 {
    u_tangent(kind, coords, u, v).cross(&v_tangent(kind, coords, u, v))
}

fn patch_sum(coords: &[f64], wu: &[f64; 4], wv: &[f64; 4]) -> Vec3 {
    let mut sum = Vec3::zeros();
    for j in 0..4 {
        for i in 0..4 {
            sum += point_at(coords, 4 * j + i).coords * (wu[i] * wv[j]);
        }
    }
    sum
}

/// Directional derivative `3 * sum B2_ijk (P_plus - P_ijk+1)` where
/// `pair(i, j)` names the raised control point and the one raised in w.
fn triangle_derivative(
    coords: &[f64],
    u: f64,
    v: f64,
    pair: impl Fn(usize, usize) -> (usize, usize),
) -> Vec3 {
    let w = 1.0 - u - v;
    let pu = [1.0, u, u * u];
    let pv = [1.0, v, v * v];
    let pw = [1.0, w, w * w];
    let mut sum = Vec3::zeros();
    for i in 0..3 {
        for j in 0..3 - i {
            let k = 2 - i - j;
            let weight = 2.0 / (FACTORIAL[i] * FACTORIAL[j] * FACTORIAL[k]) * pu[i] * pv[j] * pw[k];
            let (plus, minus) = pair(i, j);
            sum += (point_at(coords, plus) - point_at(coords, minus)) * weight;
        }
    }
    sum * 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords_of(points: &[Point3]) -> Vec<f64> {
        points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// A curved, non-symmetric cubic patch.
    fn wavy_patch() -> Vec<f64> {
        let mut pts = Vec::new();
        for j in 0..4 {
            for i in 0..4 {
                let (x, y) = (i as f64 * 1.3, j as f64 * 0.9 + 0.1 * i as f64);
                pts.push(Point3::new(x, y, (x * 0.7).sin() + (y * 0.4).cos()));
            }
        }
        coords_of(&pts)
    }

    /// Cubic triangle with control points `f(i / 3, j / 3)`.
    fn triangle_from(f: impl Fn(f64, f64) -> Point3) -> Vec<f64> {
        let mut pts = [Point3::origin(); 10];
        for i in 0..4 {
            for j in 0..4 - i {
                pts[tri_index(i, j)] = f(i as f64 / 3.0, j as f64 / 3.0);
            }
        }
        coords_of(&pts)
    }

    fn curved_triangle() -> Vec<f64> {
        triangle_from(|a, b| Point3::new(a * 2.0, b * 3.0, a * b + 0.5 * a - b * b))
    }

    fn vertex() -> Vec<f64> {
        coords_of(&[
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.5, 0.0),
            Point3::new(0.5, 1.0, 0.2),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.2, 0.3, 2.0),
        ])
    }

    #[test]
    fn test_bernstein_partition_of_unity() {
        for t in [0.0, 0.1, 0.5, 0.77, 1.0] {
            let sum: f64 = bernstein3(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-15);
            let dsum: f64 = bernstein3_derivative(t).iter().sum();
            assert!(dsum.abs() < 1e-14);
        }
    }

    #[test]
    fn test_patch_corners_exact() {
        let c = wavy_patch();
        let k = PatchKind::CubicPatch;
        assert_eq!(evaluate(k, &c, 0.0, 0.0), point_at(&c, 0));
        assert_eq!(evaluate(k, &c, 1.0, 0.0), point_at(&c, 3));
        assert_eq!(evaluate(k, &c, 0.0, 1.0), point_at(&c, 12));
        assert_eq!(evaluate(k, &c, 1.0, 1.0), point_at(&c, 15));
    }

    #[test]
    fn test_triangle_corners_exact() {
        let c = curved_triangle();
        let k = PatchKind::CubicTriangle;
        assert_eq!(evaluate(k, &c, 0.0, 0.0), point_at(&c, 0));
        assert_eq!(evaluate(k, &c, 1.0, 0.0), point_at(&c, 9));
        assert_eq!(evaluate(k, &c, 0.0, 1.0), point_at(&c, 3));
    }

    #[test]
    fn test_planar_and_vertex_corners_exact() {
        let p = coords_of(&[
            Point3::new(0.1, 0.2, 0.3),
            Point3::new(-4.0, 1.0, 7.0),
            Point3::new(3.3, -2.0, 0.0),
        ]);
        let k = PatchKind::PlanarTriangle;
        assert_eq!(evaluate(k, &p, 0.0, 0.0), point_at(&p, 0));
        assert_eq!(evaluate(k, &p, 0.0, 1.0), point_at(&p, 1));
        assert_eq!(evaluate(k, &p, 1.0, 0.0), point_at(&p, 2));

        let c = vertex();
        let k = PatchKind::CubicVertex;
        assert_eq!(evaluate(k, &c, 0.0, 0.0), point_at(&c, 0));
        assert_eq!(evaluate(k, &c, 1.0, 0.0), point_at(&c, 3));
        assert_eq!(evaluate(k, &c, 0.0, 1.0), point_at(&c, 4));
        assert_eq!(evaluate(k, &c, 1.0, 1.0), point_at(&c, 4));
    }

    #[test]
    fn test_triangle_interior_matches_edge_paths() {
        let c = curved_triangle();
        let k = PatchKind::CubicTriangle;
        // general formula just off each edge converges to the edge path
        let on_edge = evaluate(k, &c, 0.0, 0.4);
        let near_edge = evaluate(k, &c, 1e-9, 0.4);
        assert!((on_edge - near_edge).norm() < 1e-7);
        let on_w = evaluate(k, &c, 0.3, 0.7);
        let near_w = evaluate(k, &c, 0.3, 0.7 - 1e-9);
        assert!((on_w - near_w).norm() < 1e-7);
    }

    #[test]
    fn test_triangle_has_linear_precision() {
        let c = triangle_from(|a, b| Point3::new(a * 2.0, b * 3.0, 0.5 * a - b + 0.25));
        let (u, v) = (0.25, 0.35);
        let p = evaluate(PatchKind::CubicTriangle, &c, u, v);
        let expected = Point3::new(u * 2.0, v * 3.0, 0.5 * u - v + 0.25);
        assert!((p - expected).norm() < 1e-12);
    }

    fn check_tangents(kind: PatchKind, c: &[f64], u: f64, v: f64) {
        let h = 1e-6;
        let fd_u = (evaluate(kind, c, u + h, v) - evaluate(kind, c, u - h, v)) / (2.0 * h);
        let fd_v = (evaluate(kind, c, u, v + h) - evaluate(kind, c, u, v - h)) / (2.0 * h);
        assert!((u_tangent(kind, c, u, v) - fd_u).norm() < 1e-6, "{kind} du");
        assert!((v_tangent(kind, c, u, v) - fd_v).norm() < 1e-6, "{kind} dv");
    }

    #[test]
    fn test_tangents_match_finite_differences() {
        check_tangents(PatchKind::CubicPatch, &wavy_patch(), 0.3, 0.6);
        check_tangents(PatchKind::CubicTriangle, &curved_triangle(), 0.2, 0.3);
        check_tangents(PatchKind::CubicVertex, &vertex(), 0.4, 0.5);
        let p = coords_of(&[
            Point3::origin(),
            Point3::new(0.0, 2.0, 1.0),
            Point3::new(3.0, 0.0, 0.0),
        ]);
        check_tangents(PatchKind::PlanarTriangle, &p, 0.2, 0.2);
    }

    #[test]
    fn test_vertex_u_tangent_zero_at_apex() {
        let c = vertex();
        let t = u_tangent(PatchKind::CubicVertex, &c, 0.5, 1.0);
        assert_eq!(t, Vec3::zeros());
        // normal is defined (zero) rather than panicking
        assert_eq!(normal(PatchKind::CubicVertex, &c, 0.5, 1.0), Vec3::zeros());
    }

    #[test]
    fn test_planar_normal_points_along_tu_cross_tv() {
        let p = coords_of(&[
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        let n = normal(PatchKind::PlanarTriangle, &p, 0.1, 0.1);
        assert_eq!(n, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_barycentric_uses_given_w() {
        let c = curved_triangle();
        let k = PatchKind::CubicTriangle;
        let a = evaluate_barycentric(k, &c, 0.2, 0.3, 0.5);
        let b = evaluate(k, &c, 0.2, 0.3);
        assert!((a - b).norm() < 1e-14);
        assert_eq!(evaluate_barycentric(k, &c, 0.0, 0.0, 1.0), point_at(&c, 0));
    }
}
