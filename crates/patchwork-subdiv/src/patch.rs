//! Bisection of bicubic patches.
//!
//! A patch grid is a flat `[f64; 48]` with point `(i, j)` at `4 * j + i`.
//! Applying [`SL`] or [`SR`] along u mixes points within a row; along v it
//! mixes points within a column.

use crate::curve::{SL, SR};

/// Flat control-point buffer of a bicubic patch.
pub type Grid = [f64; 48];

#[inline]
fn at(i: usize, j: usize, c: usize) -> usize {
    3 * (4 * j + i) + c
}

fn apply_u(g: &Grid, s: &[[f64; 4]; 4]) -> Grid {
    let mut out = [0.0; 48];
    for j in 0..4 {
        for i in 0..4 {
            for c in 0..3 {
                out[at(i, j, c)] = s[i][0] * g[at(0, j, c)]
                    + s[i][1] * g[at(1, j, c)]
                    + s[i][2] * g[at(2, j, c)]
                    + s[i][3] * g[at(3, j, c)];
            }
        }
    }
    out
}

fn apply_v(g: &Grid, s: &[[f64; 4]; 4]) -> Grid {
    let mut out = [0.0; 48];
    for j in 0..4 {
        for i in 0..4 {
            for c in 0..3 {
                out[at(i, j, c)] = s[j][0] * g[at(i, 0, c)]
                    + s[j][1] * g[at(i, 1, c)]
                    + s[j][2] * g[at(i, 2, c)]
                    + s[j][3] * g[at(i, 3, c)];
            }
        }
    }
    out
}

/// Rotate the parametrization by 180 degrees: `(i, j) -> (3 - i, 3 - j)`.
pub fn reflect(g: &Grid) -> Grid {
    let mut out = [0.0; 48];
    for j in 0..4 {
        for i in 0..4 {
            for c in 0..3 {
                out[at(i, j, c)] = g[at(3 - i, 3 - j, c)];
            }
        }
    }
    out
}

/// Element-wise mean of two grids.
pub fn average(a: &Grid, b: &Grid) -> Grid {
    let mut out = [0.0; 48];
    for k in 0..48 {
        out[k] = (a[k] + b[k]) / 2.0;
    }
    out
}

/// The half of the patch with `u` in `[0, 0.5]`.
pub fn left_patch(g: &Grid) -> Grid {
    apply_u(g, &SL)
}

/// The half of the patch with `u` in `[0.5, 1]`.
pub fn right_patch(g: &Grid) -> Grid {
    apply_u(g, &SR)
}

/// The half of the patch with `v` in `[0, 0.5]`.
pub fn bottom_patch(g: &Grid) -> Grid {
    apply_v(g, &SL)
}

/// The half of the patch with `v` in `[0.5, 1]`.
pub fn top_patch(g: &Grid) -> Grid {
    apply_v(g, &SR)
}

fn quadrant(g: &Grid, q: usize) -> Grid {
    let su = if q & 1 == 0 { &SL } else { &SR };
    let sv = if q & 2 == 0 { &SL } else { &SR };
    apply_v(&apply_u(g, su), sv)
}

/// Split a patch into its four quadrants.
///
/// Order: (u low, v low), (u high, v low), (u low, v high), (u high, v
/// high). Each quadrant is averaged with the same quadrant computed from
/// the reflected grid, so a neighbour holding the shared edge in the
/// opposite direction computes bit-identical child edges.
pub fn split_cubic_patch(g: &Grid) -> [Grid; 4] {
    let r = reflect(g);
    [0, 1, 2, 3].map(|q| average(&quadrant(g, q), &reflect(&quadrant(&r, 3 - q))))
}
