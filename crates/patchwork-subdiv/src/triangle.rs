//! Bisection of cubic and planar triangles.
//!
//! Cubic triangles are split across their u = 0 edge, from the opposite
//! (u) corner to the edge midpoint. [`permute_cubic_triangle`] first
//! rotates the barycentric roles so that the longest edge is the one cut.

use patchwork_math::Point3;

use crate::curve::{midpoint, split_cubic_curve};
use crate::point_at;

/// Flat control-point buffer of a cubic triangle.
pub type Triangle = [f64; 30];

/// Flat control-point buffer of a planar triangle.
pub type Planar = [f64; 9];

// P003 P012 P021 P030 P102 P111 P120 P201 P210 P300
const ROTATE_U_EDGE: [usize; 10] = [9, 7, 4, 0, 8, 5, 1, 6, 2, 3];
const ROTATE_W_EDGE: [usize; 10] = [3, 6, 8, 9, 2, 5, 7, 1, 4, 0];

fn points(t: &[f64]) -> [Point3; 10] {
    std::array::from_fn(|i| point_at(t, i))
}

fn flatten<const N: usize>(points: &[Point3]) -> [f64; N] {
    let mut out = [0.0; N];
    for (k, p) in points.iter().enumerate() {
        out[3 * k] = p.x;
        out[3 * k + 1] = p.y;
        out[3 * k + 2] = p.z;
    }
    out
}

/// Rotate barycentric roles so the longest edge becomes the u = 0 edge.
///
/// The rotation is cyclic, so orientation is preserved. Ties keep the
/// current u = 0 edge.
pub fn permute_cubic_triangle(t: &Triangle) -> Triangle {
    let p = points(t);
    let len_v = (p[0] - p[3]).norm_squared();
    let len_u = (p[0] - p[9]).norm_squared();
    let len_w = (p[3] - p[9]).norm_squared();
    if len_v >= len_u && len_v >= len_w {
        return *t;
    }
    let map = if len_u >= len_w {
        &ROTATE_U_EDGE
    } else {
        &ROTATE_W_EDGE
    };
    let permuted: Vec<Point3> = map.iter().map(|&i| p[i]).collect();
    flatten(&permuted)
}

/// Split a cubic triangle through the midpoint of its u = 0 edge.
///
/// Returns the half containing the w corner, then the half containing the
/// v corner. Both keep the parent orientation.
pub fn split_cubic_triangle(t: &Triangle) -> (Triangle, Triangle) {
    let [p003, p012, p021, p030, p102, p111, p120, p201, p210, p300] = points(t);
    let (l, r) = split_cubic_curve(&[p003, p012, p021, p030]);
    let cp120 = Point3::from(p102.coords * 0.25 + p111.coords * 0.5 + p120.coords * 0.25);
    let cp210 = Point3::from(p201.coords * 0.5 + p210.coords * 0.5);
    let cp111_low = Point3::from(p102.coords * 0.5 + p111.coords * 0.5);
    let cp111_high = Point3::from(p120.coords * 0.5 + p111.coords * 0.5);
    let t1 = [p300, p201, p102, p003, cp210, cp111_low, l[1], cp120, l[2], l[3]];
    let t2 = [p030, p120, p210, p300, r[2], cp111_high, cp210, r[1], cp120, r[0]];
    (flatten(&t1), flatten(&t2))
}

/// Split a cubic triangle into four.
///
/// The longest edge is bisected first, then each half is bisected across
/// its own u = 0 edge.
pub fn quarter_cubic_triangle(t: &Triangle) -> [Triangle; 4] {
    let (a, b) = split_cubic_triangle(&permute_cubic_triangle(t));
    let (a0, a1) = split_cubic_triangle(&a);
    let (b0, b1) = split_cubic_triangle(&b);
    [a0, a1, b0, b1]
}

/// Split a planar triangle into three corner triangles and a central one.
pub fn quarter_planar_triangle(t: &Planar) -> [Planar; 4] {
    let (p0, p1, p2) = (point_at(t, 0), point_at(t, 1), point_at(t, 2));
    let m01 = midpoint(&p0, &p1);
    let m02 = midpoint(&p0, &p2);
    let m12 = midpoint(&p1, &p2);
    [
        flatten(&[p0, m01, m02]),
        flatten(&[m01, p1, m12]),
        flatten(&[m02, m12, p2]),
        flatten(&[m01, m12, m02]),
    ]
}
