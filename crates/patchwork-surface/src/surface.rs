//! The owned patch store and its topology queries.

use std::fmt;

use patchwork_math::{BoundingBox, Point3, Tolerances, Transform};
use patchwork_patch::Patch;

use crate::boundary::{chain_edges, BoundaryPath};
use crate::error::{Result, SurfaceError};
use crate::iter::{SurfaceCursor, SurfaceIterator};
use crate::subdivide::SubdivisionIterator;
use crate::topology::{analyze, component_labels, EdgeAnalysis, TopologyIssue};

/// An ordered collection of patches.
///
/// An oriented surface requires neighbouring patches to traverse shared
/// edges in opposite directions, so every normal points to the same side.
/// A two-sided surface accepts either direction.
#[derive(Debug, Clone)]
pub struct Surface {
    patches: Vec<Patch>,
    oriented: bool,
    tolerances: Tolerances,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Empty oriented surface.
    pub fn new() -> Self {
        Self {
            patches: Vec::new(),
            oriented: true,
            tolerances: Tolerances::DEFAULT,
        }
    }

    /// Empty two-sided surface.
    pub fn two_sided() -> Self {
        Self {
            oriented: false,
            ..Self::new()
        }
    }

    /// Use `tolerances` when matching edges.
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Tolerances used when matching edges.
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Append a patch.
    pub fn append(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Append a planar triangle from its w, v and u corners.
    pub fn append_planar_triangle(&mut self, points: &[Point3; 3]) -> Result<()> {
        self.append(Patch::planar_triangle(points)?);
        Ok(())
    }

    /// Append a cubic triangle.
    pub fn append_cubic_triangle(&mut self, points: &[Point3; 10]) -> Result<()> {
        self.append(Patch::cubic_triangle(points)?);
        Ok(())
    }

    /// Append a bicubic patch.
    pub fn append_cubic_patch(&mut self, points: &[Point3; 16]) -> Result<()> {
        self.append(Patch::cubic_patch(points)?);
        Ok(())
    }

    /// Append a cubic curve swept to `apex`.
    pub fn append_cubic_vertex(&mut self, curve: &[Point3; 4], apex: &Point3) -> Result<()> {
        self.append(Patch::cubic_vertex(curve, apex)?);
        Ok(())
    }

    /// Append a cubic vertex with its curve traversed backwards, which
    /// flips its normal.
    pub fn append_flipped_cubic_vertex(&mut self, curve: &[Point3; 4], apex: &Point3) -> Result<()> {
        let [a, b, c, d] = *curve;
        self.append_cubic_vertex(&[d, c, b, a], apex)
    }

    /// Append copies of every patch of `other`.
    pub fn append_surface(&mut self, other: &Surface) {
        self.patches.extend_from_slice(&other.patches);
    }

    /// Drain `iter` into this surface.
    pub fn extend(&mut self, mut iter: impl SurfaceIterator) -> Result<()> {
        while !iter.is_done() {
            self.patches.push(iter.current_patch()?);
            iter.next()?;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of patches.
    pub fn size(&self) -> usize {
        self.patches.len()
    }

    /// True if the surface has no patches.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Patch `i`, if present.
    pub fn patch(&self, i: usize) -> Option<&Patch> {
        self.patches.get(i)
    }

    /// All patches in insertion order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// True for an oriented surface.
    pub fn is_oriented(&self) -> bool {
        self.oriented
    }

    /// Bounds of every control point, or `None` for an empty surface.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut iter = self.patches.iter().map(Patch::bounds);
        let mut bbox = iter.next()?;
        for b in iter {
            bbox.union(&b);
        }
        Some(bbox)
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Cursor over the patches.
    pub fn iter(&self) -> SurfaceCursor<'_> {
        SurfaceCursor::new(&self.patches, self.oriented)
    }

    /// Cursor yielding every patch transformed by `transform`.
    ///
    /// A transform that does not preserve orientation flips every normal.
    pub fn iter_transformed(&self, transform: Transform) -> SurfaceCursor<'_> {
        self.iter().with_transform(transform)
    }

    /// Iterator over every patch split `level` times.
    pub fn subdivided(&self, level: u32) -> Result<SubdivisionIterator<SurfaceCursor<'_>>> {
        SubdivisionIterator::new(self.iter(), level)
    }

    /// Flip the normal of every patch.
    pub fn reverse_orientation(&mut self) {
        for patch in &mut self.patches {
            patch.reverse_orientation();
        }
    }

    // =========================================================================
    // Topology
    // =========================================================================

    fn analysis(&self) -> EdgeAnalysis {
        analyze(&self.patches, self.oriented, &self.tolerances)
    }

    /// Every manifold violation, in edge order.
    pub fn well_formed_issues(&self) -> Vec<TopologyIssue> {
        self.analysis().issues
    }

    /// True if no edge is shared by more than two patches and, on an
    /// oriented surface, no two patches traverse a shared edge the same way.
    pub fn is_well_formed(&self) -> bool {
        self.well_formed_issues().is_empty()
    }

    /// Write one line per manifold violation to `out`.
    ///
    /// Returns whether the surface is well formed.
    pub fn write_well_formed_report(&self, out: &mut impl fmt::Write) -> std::result::Result<bool, fmt::Error> {
        let issues = self.well_formed_issues();
        for issue in &issues {
            writeln!(out, "{issue}")?;
        }
        Ok(issues.is_empty())
    }

    /// Unmatched edges chained into subpaths.
    pub fn boundary(&self) -> BoundaryPath {
        let analysis = self.analysis();
        let open: Vec<_> = analysis.unmatched().cloned().collect();
        chain_edges(open, &self.tolerances)
    }

    /// True if the surface is well formed and has no boundary.
    pub fn is_closed_manifold(&self) -> bool {
        let analysis = self.analysis();
        analysis.issues.is_empty() && analysis.unmatched().next().is_none()
    }

    /// Number of edge-connected components.
    pub fn number_of_components(&self) -> usize {
        component_labels(self.patches.len(), &self.analysis()).0
    }

    /// Component `index`, numbered by lowest patch index.
    pub fn component(&self, index: usize) -> Result<Surface> {
        let (count, labels) = component_labels(self.patches.len(), &self.analysis());
        if index >= count {
            return Err(SurfaceError::ComponentOutOfRange { index, count });
        }
        Ok(self.with_patches(
            self.patches
                .iter()
                .zip(&labels)
                .filter(|(_, l)| **l == index)
                .map(|(p, _)| p.clone())
                .collect(),
        ))
    }

    /// Every component, numbered by lowest patch index. Patches keep their
    /// relative order.
    pub fn components(&self) -> Vec<Surface> {
        let (count, labels) = component_labels(self.patches.len(), &self.analysis());
        let mut parts: Vec<Vec<Patch>> = vec![Vec::new(); count];
        for (patch, &label) in self.patches.iter().zip(&labels) {
            parts[label].push(patch.clone());
        }
        parts.into_iter().map(|p| self.with_patches(p)).collect()
    }

    fn with_patches(&self, patches: Vec<Patch>) -> Surface {
        Surface {
            patches,
            oriented: self.oriented,
            tolerances: self.tolerances,
        }
    }
}
