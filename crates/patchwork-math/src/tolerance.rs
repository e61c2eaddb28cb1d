use serde::{Deserialize, Serialize};

use crate::Point3;

/// Tolerances for comparing control points produced by independent
/// computations.
///
/// Coordinates are compared with an epsilon proportional to their
/// magnitude: `max(|a|, |b|, min_scale) * f64::EPSILON * ulps`. Two
/// control points computed along different paths from the same inputs
/// typically differ by a few ULPs, never by a fixed absolute amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Number of units in the last place two coordinates may differ by.
    pub ulps: f64,
    /// Smallest magnitude used when scaling the epsilon, so values near
    /// zero are not compared exactly.
    pub min_scale: f64,
}

impl Tolerances {
    /// Default tolerances: 64 ULPs, scale floor of 1.0.
    pub const DEFAULT: Self = Self {
        ulps: 64.0,
        min_scale: 1.0,
    };

    /// Exact comparison (zero ULPs).
    pub const EXACT: Self = Self {
        ulps: 0.0,
        min_scale: 1.0,
    };

    /// Epsilon for comparing `a` and `b`.
    pub fn epsilon(&self, a: f64, b: f64) -> f64 {
        a.abs().max(b.abs()).max(self.min_scale) * f64::EPSILON * self.ulps
    }

    /// Check if two coordinates are equal within the scaled epsilon.
    pub fn coords_equal(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.epsilon(a, b)
    }

    /// Check if two points are equal coordinate by coordinate.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        self.coords_equal(a.x, b.x) && self.coords_equal(a.y, b.y) && self.coords_equal(a.z, b.z)
    }

    /// Grid cell size used to bucket points whose largest coordinate
    /// magnitude is `scale`.
    ///
    /// Cells are many epsilons wide, so matching points land in the same
    /// or a neighbouring cell.
    pub fn cell_size(&self, scale: f64) -> f64 {
        let eps = scale.max(self.min_scale) * f64::EPSILON * self.ulps.max(1.0);
        eps * 1024.0
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_scales_with_magnitude() {
        let tol = Tolerances::DEFAULT;
        let small = tol.epsilon(1.0, 1.0);
        let large = tol.epsilon(1.0e6, 1.0e6);
        assert!((large / small - 1.0e6).abs() < 1e-6);
        // values near zero use the floor
        assert_eq!(tol.epsilon(1e-20, 0.0), small);
    }

    #[test]
    fn test_points_equal_within_ulps() {
        let tol = Tolerances::DEFAULT;
        let a = Point3::new(100.0, -50.0, 0.0);
        let b = Point3::new(100.0 + 1e-12, -50.0, 1e-15);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(100.0 + 1e-9, -50.0, 0.0);
        assert!(!tol.points_equal(&a, &c));
    }

    #[test]
    fn test_exact_tolerance() {
        let tol = Tolerances::EXACT;
        assert!(tol.coords_equal(0.1 + 0.2, 0.1 + 0.2));
        assert!(!tol.coords_equal(0.1 + 0.2, 0.3));
    }
}
