//! Degree elevation of Bezier curves.

use patchwork_math::Point3;

use crate::buf::{point_at, set_point};

use crate::error::{PatchError, Result};

/// Raise a Bezier curve of `degree` by one.
///
/// Uses the first `degree + 1` points of `input` and returns `degree + 2`
/// points describing the same polynomial:
/// `Q0 = P0`, `Q(n+1) = Pn`, `Qi = i/(n+1) P(i-1) + (1 - i/(n+1)) Pi`.
pub fn elevate_degree(degree: usize, input: &[Point3]) -> Result<Vec<Point3>> {
    if input.len() < degree + 1 {
        return Err(PatchError::CurveTooShort {
            degree,
            got: input.len(),
        });
    }
    let n1 = (degree + 1) as f64;
    let mut out = Vec::with_capacity(degree + 2);
    out.push(input[0]);
    for i in 1..=degree {
        let a = i as f64 / n1;
        out.push(Point3::from(input[i - 1].coords * a + input[i].coords * (1.0 - a)));
    }
    out.push(input[degree]);
    Ok(out)
}

/// Cubic control points of the segment from `a` to `b`.
///
/// `line_to_cubic(b, a)` is the exact reversal of `line_to_cubic(a, b)`.
pub fn line_to_cubic(a: &Point3, b: &Point3) -> [Point3; 4] {
    let p1 = (a.coords * 2.0 + b.coords) / 3.0;
    let p2 = (a.coords + b.coords * 2.0) / 3.0;
    [*a, Point3::from(p1), Point3::from(p2), *b]
}

/// Cubic control points of the quadratic curve `p0, p1, p2`.
///
/// Reversing the input reverses the output exactly.
pub fn quadratic_to_cubic(p0: &Point3, p1: &Point3, p2: &Point3) -> [Point3; 4] {
    let q1 = (p0.coords + p1.coords * 2.0) / 3.0;
    let q2 = (p1.coords * 2.0 + p2.coords) / 3.0;
    [*p0, Point3::from(q1), Point3::from(q2), *p2]
}

/// Exact cubic-patch form of a cubic vertex.
///
/// Row 0 is the curve, row 3 collapses to the apex and each column is the
/// elevated segment from a curve point to the apex.
///
/// # Panics
/// Panics if `coords` holds fewer than 15 values.
pub fn cubic_vertex_to_patch(coords: &[f64]) -> [f64; 48] {
    let apex = point_at(coords, 4);
    let mut out = [0.0; 48];
    for i in 0..4 {
        let column = line_to_cubic(&point_at(coords, i), &apex);
        for (j, p) in column.iter().enumerate() {
            set_point(&mut out, 4 * j + i, p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{cubic_curve_point, evaluate};
    use crate::PatchKind;

    fn quad_point(p: &[Point3], t: f64) -> Point3 {
        let s = 1.0 - t;
        Point3::from(p[0].coords * (s * s) + p[1].coords * (2.0 * s * t) + p[2].coords * (t * t))
    }

    #[test]
    fn test_elevate_quadratic_reproduces_curve() {
        let quad = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, -1.0),
            Point3::new(3.0, 0.5, 2.0),
        ];
        let cubic = elevate_degree(2, &quad).unwrap();
        assert_eq!(cubic.len(), 4);
        let cubic: [Point3; 4] = [cubic[0], cubic[1], cubic[2], cubic[3]];
        for t in [0.0, 0.2, 0.5, 0.9, 1.0] {
            let d = cubic_curve_point(&cubic, t) - quad_point(&quad, t);
            assert!(d.norm() < 1e-14);
        }
        let sym = quadratic_to_cubic(&quad[0], &quad[1], &quad[2]);
        for k in 0..4 {
            assert!((sym[k] - cubic[k]).norm() < 1e-14);
        }
    }

    #[test]
    fn test_elevate_rejects_short_curve() {
        let err = elevate_degree(3, &[Point3::origin(); 3]).unwrap_err();
        assert_eq!(err, PatchError::CurveTooShort { degree: 3, got: 3 });
    }

    #[test]
    fn test_line_to_cubic_reverses_exactly() {
        let a = Point3::new(0.1, -7.3, 1e5);
        let b = Point3::new(2.9, 0.7, -3.3);
        let fwd = line_to_cubic(&a, &b);
        let rev = line_to_cubic(&b, &a);
        for k in 0..4 {
            assert_eq!(fwd[k], rev[3 - k]);
        }
        let q = quadratic_to_cubic(&a, &b, &a);
        assert_eq!(q[1], q[2]);
    }

    #[test]
    fn test_vertex_to_patch_is_exact() {
        let vertex: Vec<f64> = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.6, 0.1),
            Point3::new(0.6, 1.0, -0.1),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.5),
        ]
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .collect();
        let patch = cubic_vertex_to_patch(&vertex);
        for &(u, v) in &[(0.0, 0.0), (0.3, 0.2), (0.7, 0.9), (1.0, 0.5), (0.5, 1.0)] {
            let a = evaluate(PatchKind::CubicVertex, &vertex, u, v);
            let b = evaluate(PatchKind::CubicPatch, &patch, u, v);
            assert!((a - b).norm() < 1e-14, "({u}, {v})");
        }
        // top row collapses onto the apex
        for i in 12..16 {
            assert_eq!(point_at(&patch, i), Point3::new(0.0, 0.0, 1.5));
        }
    }
}
