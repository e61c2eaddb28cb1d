//! Patch kinds and the owned patch value.

use std::fmt;

use patchwork_math::{BoundingBox, Point3, Transform, Vec3};

use crate::buf::point_at;
use crate::error::{PatchError, Result};
use crate::eval;

/// The four surface element kinds understood by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    /// Flat triangle: P0 (w corner), P1 (v corner), P2 (u corner).
    PlanarTriangle,
    /// Cubic Bezier triangle with ten control points.
    CubicTriangle,
    /// Tensor-product bicubic Bezier patch, 4x4 control points.
    CubicPatch,
    /// Cubic curve C0..C3 swept linearly to an apex A.
    CubicVertex,
}

impl PatchKind {
    /// Number of doubles in a control-point buffer of this kind.
    pub const fn coord_len(self) -> usize {
        3 * self.point_count()
    }

    /// Number of control points.
    pub const fn point_count(self) -> usize {
        match self {
            PatchKind::PlanarTriangle => 3,
            PatchKind::CubicTriangle => 10,
            PatchKind::CubicPatch => 16,
            PatchKind::CubicVertex => 5,
        }
    }

    /// True if the parameter domain is the triangle `u + v <= 1`.
    ///
    /// Cubic vertices are triangles geometrically but are parametrized
    /// over the unit square.
    pub const fn is_triangular(self) -> bool {
        matches!(self, PatchKind::PlanarTriangle | PatchKind::CubicTriangle)
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatchKind::PlanarTriangle => "planar triangle",
            PatchKind::CubicTriangle => "cubic triangle",
            PatchKind::CubicPatch => "cubic patch",
            PatchKind::CubicVertex => "cubic vertex",
        };
        f.write_str(name)
    }
}

/// A single surface element: kind, control points and an optional
/// diagnostic tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    kind: PatchKind,
    coords: Vec<f64>,
    tag: Option<String>,
}

impl Patch {
    /// Build a patch from a flat coordinate buffer.
    ///
    /// Only the first `kind.coord_len()` values are used. Fails if the
    /// buffer is too short or contains a non-finite value.
    pub fn new(kind: PatchKind, coords: &[f64]) -> Result<Self> {
        let needed = kind.coord_len();
        if coords.len() < needed {
            return Err(PatchError::BufferTooSmall {
                kind,
                needed,
                got: coords.len(),
            });
        }
        let coords = &coords[..needed];
        if let Some(index) = coords.iter().position(|c| !c.is_finite()) {
            return Err(PatchError::NonFinite { index });
        }
        Ok(Self {
            kind,
            coords: coords.to_vec(),
            tag: None,
        })
    }

    /// Attach a diagnostic tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Planar triangle from its w, v and u corners.
    pub fn planar_triangle(points: &[Point3; 3]) -> Result<Self> {
        Self::from_points(PatchKind::PlanarTriangle, points)
    }

    /// Cubic triangle from ten points in P003, P012, P021, P030, P102,
    /// P111, P120, P201, P210, P300 order.
    pub fn cubic_triangle(points: &[Point3; 10]) -> Result<Self> {
        Self::from_points(PatchKind::CubicTriangle, points)
    }

    /// Cubic patch from a 4x4 grid; point (i, j) at index `4 * j + i`.
    pub fn cubic_patch(points: &[Point3; 16]) -> Result<Self> {
        Self::from_points(PatchKind::CubicPatch, points)
    }

    /// Cubic vertex from a cubic curve and an apex.
    pub fn cubic_vertex(curve: &[Point3; 4], apex: &Point3) -> Result<Self> {
        let points = [curve[0], curve[1], curve[2], curve[3], *apex];
        Self::from_points(PatchKind::CubicVertex, &points)
    }

    fn from_points(kind: PatchKind, points: &[Point3]) -> Result<Self> {
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        Self::new(kind, &coords)
    }

    /// Bicubic child of this patch, inheriting its tag.
    pub fn child_cubic_patch(&self, coords: [f64; 48]) -> Patch {
        self.derived(PatchKind::CubicPatch, coords.to_vec())
    }

    /// Cubic-triangle child of this patch, inheriting its tag.
    pub fn child_cubic_triangle(&self, coords: [f64; 30]) -> Patch {
        self.derived(PatchKind::CubicTriangle, coords.to_vec())
    }

    /// Planar-triangle child of this patch, inheriting its tag.
    pub fn child_planar_triangle(&self, coords: [f64; 9]) -> Patch {
        self.derived(PatchKind::PlanarTriangle, coords.to_vec())
    }

    /// Cubic-vertex child of this patch, inheriting its tag.
    pub fn child_cubic_vertex(&self, coords: [f64; 15]) -> Patch {
        self.derived(PatchKind::CubicVertex, coords.to_vec())
    }

    // callers pass exactly `kind.coord_len()` values
    fn derived(&self, kind: PatchKind, coords: Vec<f64>) -> Patch {
        debug_assert_eq!(coords.len(), kind.coord_len());
        Patch {
            kind,
            coords,
            tag: self.tag.clone(),
        }
    }

    /// Patch kind.
    pub fn kind(&self) -> PatchKind {
        self.kind
    }

    /// Flat control-point buffer.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Diagnostic tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Control point `i`, or `None` past the last one.
    pub fn point(&self, i: usize) -> Option<Point3> {
        (i < self.kind.point_count()).then(|| point_at(&self.coords, i))
    }

    /// All control points.
    pub fn points(&self) -> Vec<Point3> {
        (0..self.kind.point_count()).map(|i| point_at(&self.coords, i)).collect()
    }

    /// Bounds of the control net, which contain the surface.
    pub fn bounds(&self) -> BoundingBox {
        let mut bbox = BoundingBox::from_point(&point_at(&self.coords, 0));
        for i in 1..self.kind.point_count() {
            bbox.add_point(&point_at(&self.coords, i));
        }
        bbox
    }

    /// Copy with every control point transformed.
    pub fn transformed(&self, transform: &Transform) -> Patch {
        let mut coords = self.coords.clone();
        transform.apply_coords(&mut coords);
        self.derived(self.kind, coords)
    }

    /// Surface point at `(u, v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> Point3 {
        eval::evaluate(self.kind, &self.coords, u, v)
    }

    /// Unnormalized normal `tu x tv` at `(u, v)`.
    pub fn normal(&self, u: f64, v: f64) -> Vec3 {
        eval::normal(self.kind, &self.coords, u, v)
    }

    /// Flip the induced normal by reparametrizing in place.
    ///
    /// Planar triangles swap P1 and P2, cubic triangles swap the u and v
    /// roles, cubic patches transpose their grid and cubic vertices
    /// reverse their curve. Applying it twice restores the patch exactly.
    pub fn reverse_orientation(&mut self) {
        let old = self.coords.clone();
        let mut copy_point = |to: usize, from: usize| {
            self.coords[3 * to..3 * to + 3].copy_from_slice(&old[3 * from..3 * from + 3]);
        };
        match self.kind {
            PatchKind::PlanarTriangle => {
                copy_point(1, 2);
                copy_point(2, 1);
            }
            PatchKind::CubicTriangle => {
                for (to, from) in TRIANGLE_UV_SWAP.iter().enumerate() {
                    copy_point(to, *from);
                }
            }
            PatchKind::CubicPatch => {
                for j in 0..4 {
                    for i in 0..4 {
                        copy_point(4 * j + i, 4 * i + j);
                    }
                }
            }
            PatchKind::CubicVertex => {
                for i in 0..4 {
                    copy_point(i, 3 - i);
                }
            }
        }
    }
}

/// Cubic triangle permutation Pijk <- Pjik.
const TRIANGLE_UV_SWAP: [usize; 10] = [0, 4, 7, 9, 1, 5, 8, 2, 6, 3];

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid() -> Patch {
        let mut points = [Point3::origin(); 16];
        for j in 0..4 {
            for i in 0..4 {
                points[4 * j + i] = Point3::new(i as f64, j as f64, (i * j) as f64 / 10.0);
            }
        }
        Patch::cubic_patch(&points).unwrap()
    }

    #[test]
    fn test_coord_lengths() {
        assert_eq!(PatchKind::PlanarTriangle.coord_len(), 9);
        assert_eq!(PatchKind::CubicTriangle.coord_len(), 30);
        assert_eq!(PatchKind::CubicPatch.coord_len(), 48);
        assert_eq!(PatchKind::CubicVertex.coord_len(), 15);
        assert!(PatchKind::CubicTriangle.is_triangular());
        assert!(!PatchKind::CubicVertex.is_triangular());
    }

    #[test]
    fn test_short_buffer_rejected() {
        let err = Patch::new(PatchKind::CubicTriangle, &[0.0; 29]).unwrap_err();
        assert_eq!(
            err,
            PatchError::BufferTooSmall {
                kind: PatchKind::CubicTriangle,
                needed: 30,
                got: 29
            }
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut coords = [0.0; 9];
        coords[4] = f64::NAN;
        let err = Patch::new(PatchKind::PlanarTriangle, &coords).unwrap_err();
        assert_eq!(err, PatchError::NonFinite { index: 4 });
    }

    #[test]
    fn test_extra_coords_ignored() {
        let patch = Patch::new(PatchKind::PlanarTriangle, &[1.0; 12]).unwrap();
        assert_eq!(patch.coords().len(), 9);
    }

    #[test]
    fn test_tag_inherited_by_transformed_copy() {
        let patch = flat_grid().with_tag("lid");
        let moved = patch.transformed(&Transform::translation(0.0, 0.0, 5.0));
        assert_eq!(moved.tag(), Some("lid"));
        assert_eq!(moved.point(0), Some(Point3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_point_out_of_range_is_none() {
        let patch = flat_grid();
        assert_eq!(patch.point(15), Some(Point3::new(3.0, 3.0, 0.9)));
        assert_eq!(patch.point(16), None);
        let tri = Patch::new(PatchKind::PlanarTriangle, &[0.5; 48]).unwrap();
        assert_eq!(tri.point(3), None);
        assert_eq!(tri.points().len(), 3);
    }

    #[test]
    fn test_typed_children_inherit_tag() {
        let parent = flat_grid().with_tag("lid");
        let grid = parent.child_cubic_patch([1.0; 48]);
        assert_eq!((grid.kind(), grid.tag()), (PatchKind::CubicPatch, Some("lid")));
        let tri = parent.child_cubic_triangle([2.0; 30]);
        assert_eq!((tri.kind(), tri.coords().len()), (PatchKind::CubicTriangle, 30));
        let flat = parent.child_planar_triangle([3.0; 9]);
        assert_eq!(flat.point(2), Some(Point3::new(3.0, 3.0, 3.0)));
        let vertex = parent.child_cubic_vertex([4.0; 15]);
        assert_eq!((vertex.kind(), vertex.tag()), (PatchKind::CubicVertex, Some("lid")));
    }

    #[test]
    fn test_reverse_orientation_flips_normal() {
        let tri = Patch::planar_triangle(&[
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ])
        .unwrap();
        let mut flipped = tri.clone();
        flipped.reverse_orientation();
        let n0 = tri.normal(0.2, 0.2);
        let n1 = flipped.normal(0.2, 0.2);
        assert!((n0 + n1).norm() < 1e-12);
        flipped.reverse_orientation();
        assert_eq!(flipped, tri);
    }

    #[test]
    fn test_reverse_orientation_involutive_for_all_kinds() {
        let coords: Vec<f64> = (0..48).map(|i| (i as f64) * 0.37 - 3.0).collect();
        for kind in [
            PatchKind::PlanarTriangle,
            PatchKind::CubicTriangle,
            PatchKind::CubicPatch,
            PatchKind::CubicVertex,
        ] {
            let patch = Patch::new(kind, &coords).unwrap();
            let mut twice = patch.clone();
            twice.reverse_orientation();
            assert_ne!(twice, patch, "{kind}");
            twice.reverse_orientation();
            assert_eq!(twice, patch, "{kind}");
        }
    }

    #[test]
    fn test_bounds_contain_net() {
        let patch = flat_grid();
        let bbox = patch.bounds();
        assert_eq!(bbox.min, Point3::origin());
        assert_eq!(bbox.max, Point3::new(3.0, 3.0, 0.9));
    }
}
