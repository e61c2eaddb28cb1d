//! Point access in flat coordinate buffers.
//!
//! Callers pass buffers of at least `3 * (index + 1)` values; every buffer
//! in this crate is sized by `PatchKind::coord_len` first.

use patchwork_math::Point3;

/// Read the point stored at `coords[3 * index..3 * index + 3]`.
#[inline]
pub(crate) fn point_at(coords: &[f64], index: usize) -> Point3 {
    let k = 3 * index;
    Point3::new(coords[k], coords[k + 1], coords[k + 2])
}

/// Write `p` to `coords[3 * index..3 * index + 3]`.
#[inline]
pub(crate) fn set_point(coords: &mut [f64], index: usize, p: &Point3) {
    let k = 3 * index;
    coords[k] = p.x;
    coords[k + 1] = p.y;
    coords[k + 2] = p.z;
}
