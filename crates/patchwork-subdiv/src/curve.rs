//! Symmetric bisection of scalars and cubic curves.

use patchwork_math::Point3;

/// Left bisection matrix: control points of the first half of a cubic.
pub const SL: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.5, 0.5, 0.0, 0.0],
    [0.25, 0.5, 0.25, 0.0],
    [0.125, 0.375, 0.375, 0.125],
];

/// Right bisection matrix: control points of the second half of a cubic.
pub const SR: [[f64; 4]; 4] = [
    [0.125, 0.375, 0.375, 0.125],
    [0.0, 0.25, 0.5, 0.25],
    [0.0, 0.0, 0.5, 0.5],
    [0.0, 0.0, 0.0, 1.0],
];

/// Midpoint of `x0` and `x3` computed through the elevated cubic segment.
///
/// `midcoord(a, b) == midcoord(b, a)` holds bit for bit, so neighbours
/// bisecting a shared straight edge from opposite ends agree. Finite
/// inputs of any magnitude give a finite result unless both lie near
/// `f64::MAX` with the same sign.
pub fn midcoord(x0: f64, x3: f64) -> f64 {
    // the elevated control points and the sums overflow above MAX / 2
    if x0.abs().max(x3.abs()) >= f64::MAX / 4.0 {
        return 2.0 * elevated_midcoord(0.5 * x0, 0.5 * x3);
    }
    elevated_midcoord(x0, x3)
}

fn elevated_midcoord(x0: f64, x3: f64) -> f64 {
    let x1 = x0 * 2.0 / 3.0 + x3 / 3.0;
    let x2 = x0 / 3.0 + x3 * 2.0 / 3.0;
    let r = 0.125 * x0 + 0.375 * x1 + 0.375 * x2 + 0.125 * x3;
    let rr = 0.125 * x3 + 0.375 * x2 + 0.375 * x1 + 0.125 * x0;
    (r + rr) / 2.0
}

/// Component-wise [`midcoord`] of two points.
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::new(midcoord(a.x, b.x), midcoord(a.y, b.y), midcoord(a.z, b.z))
}

fn apply(s: &[[f64; 4]; 4], c: &[Point3; 4]) -> [Point3; 4] {
    s.map(|row| {
        Point3::from(c[0].coords * row[0] + c[1].coords * row[1] + c[2].coords * row[2] + c[3].coords * row[3])
    })
}

fn reversed(c: &[Point3; 4]) -> [Point3; 4] {
    [c[3], c[2], c[1], c[0]]
}

fn average(a: &[Point3; 4], b: &[Point3; 4]) -> [Point3; 4] {
    [0, 1, 2, 3].map(|k| Point3::from((a[k].coords + b[k].coords) / 2.0))
}

/// Split a cubic Bezier curve at `t = 0.5`.
///
/// Each half averages the forward computation with the one done on the
/// reversed curve, so splitting the reversed curve yields the reversed
/// halves exactly.
pub fn split_cubic_curve(c: &[Point3; 4]) -> ([Point3; 4], [Point3; 4]) {
    let rc = reversed(c);
    let left = average(&apply(&SL, c), &reversed(&apply(&SR, &rc)));
    let right = average(&apply(&SR, c), &reversed(&apply(&SL, &rc)));
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_patch::eval::cubic_curve_point;

    /// Deterministic pseudo-random doubles spanning many magnitudes.
    fn samples() -> Vec<f64> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        (0..2000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let mantissa = (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
                let exponent = ((state & 0x3f) as i32) - 32;
                mantissa * 2f64.powi(exponent)
            })
            .collect()
    }

    #[test]
    fn test_midcoord_symmetric_exactly() {
        let xs = samples();
        for pair in xs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(midcoord(a, b).to_bits(), midcoord(b, a).to_bits(), "{a} {b}");
        }
        assert_eq!(midcoord(0.1, 0.7), midcoord(0.7, 0.1));
        assert_eq!(midcoord(-3.0, 3.0), 0.0);
    }

    /// Finite doubles from raw bit patterns, subnormals and values near
    /// `f64::MAX` included.
    fn wide_samples() -> Vec<f64> {
        let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut xs = vec![f64::MAX, -f64::MAX, f64::MIN_POSITIVE, f64::from_bits(1), -f64::from_bits(3)];
        while xs.len() < 4000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let x = f64::from_bits(state);
            if x.is_finite() {
                xs.push(x);
            }
        }
        xs
    }

    #[test]
    fn test_midcoord_symmetric_over_full_range() {
        let xs = wide_samples();
        let tiny = f64::from_bits(1);
        for pair in xs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let m = midcoord(a, b);
            assert_eq!(m.to_bits(), midcoord(b, a).to_bits(), "{a:e} {b:e}");
            if a.signum() != b.signum() || a.abs().max(b.abs()) < f64::MAX / 2.0 {
                assert!(m.is_finite(), "{a:e} {b:e} -> {m:e}");
                let expected = 0.5 * a + 0.5 * b;
                assert!(
                    (m - expected).abs() <= 8.0 * f64::EPSILON * (a.abs() + b.abs()) + 8.0 * tiny,
                    "{a:e} {b:e} -> {m:e}"
                );
            }
        }
    }

    #[test]
    fn test_midcoord_near_overflow() {
        assert_eq!(midcoord(f64::MAX, -f64::MAX), 0.0);
        assert_eq!(midcoord(-f64::MAX, f64::MAX), 0.0);
        for (a, b) in [(1e308, 1.5e308), (-1.7e308, 1.0), (f64::MAX, 0.0), (-f64::MAX / 3.0, f64::MAX)] {
            let m = midcoord(a, b);
            assert!(m.is_finite(), "{a:e} {b:e} -> {m:e}");
            let expected = 0.5 * a + 0.5 * b;
            assert!((m - expected).abs() <= 8.0 * f64::EPSILON * (a.abs() + b.abs()), "{a:e} {b:e}");
            assert_eq!(m.to_bits(), midcoord(b, a).to_bits());
        }
    }

    #[test]
    fn test_midcoord_subnormals() {
        let tiny = f64::from_bits(1);
        assert_eq!(midcoord(0.0, 0.0), 0.0);
        assert_eq!(midcoord(tiny, -tiny), 0.0);
        let m = midcoord(f64::MIN_POSITIVE, 3.0 * tiny);
        assert!(m > 0.0 && m < f64::MIN_POSITIVE);
        assert_eq!(m.to_bits(), midcoord(3.0 * tiny, f64::MIN_POSITIVE).to_bits());
    }

    #[test]
    fn test_midcoord_is_midpoint() {
        for (a, b) in [(0.0, 1.0), (-5.5, 12.25), (1e6, 1e6 + 3.0)] {
            assert!((midcoord(a, b) - (a + b) / 2.0).abs() <= 1e-12 * (1.0 + a.abs() + b.abs()));
        }
    }

    fn curve() -> [Point3; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.5),
            Point3::new(2.5, -1.0, 1.0),
            Point3::new(4.0, 0.3, -0.2),
        ]
    }

    #[test]
    fn test_split_curve_reproduces_parent() {
        let c = curve();
        let (left, right) = split_cubic_curve(&c);
        for t in [0.0, 0.1, 0.5, 0.8, 1.0] {
            let pl = cubic_curve_point(&left, t);
            let pr = cubic_curve_point(&right, t);
            assert!((pl - cubic_curve_point(&c, t / 2.0)).norm() < 1e-12);
            assert!((pr - cubic_curve_point(&c, 0.5 + t / 2.0)).norm() < 1e-12);
        }
        assert_eq!(left[3], right[0]);
    }

    #[test]
    fn test_split_reversed_curve_is_reversed_split() {
        let c = curve();
        let (left, right) = split_cubic_curve(&c);
        let (rl, rr) = split_cubic_curve(&reversed(&c));
        assert_eq!(rl, reversed(&right));
        assert_eq!(rr, reversed(&left));
    }
}
