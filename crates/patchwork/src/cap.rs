//! Cones and caps fanned from a boundary path to a single point.
//!
//! Each segment of a path becomes one cubic vertex whose apex is the fan
//! point. Straight segments are degree-elevated first, so a cap built
//! from [`Surface::boundary`] shares its edges exactly with the surface
//! it closes.

use patchwork_integrate::GaussLegendre;
use patchwork_math::{Dir3, KahanAdder, Point3};
use patchwork_patch::eval::{cubic_curve_derivative, cubic_curve_point};
use patchwork_patch::{line_to_cubic, Patch};
use patchwork_surface::{BoundaryPath, Segment, Subpath, Surface};

use crate::error::{KernelError, Result};

/// Gauss-Legendre points per segment for the length-weighted center.
const CENTER_ORDER: usize = 8;

/// Gauss-Legendre points per segment for the area vector; exact for cubic
/// segments.
const NORMAL_ORDER: usize = 4;

/// Builder for surfaces fanned from a path to one point.
///
/// The fan point is the explicit apex when one is set. Otherwise it is
/// the center (by default the length-weighted centroid of the path)
/// moved by `height` along the path's unit normal.
///
/// ```rust
/// use patchwork::{PathFan, Point3, Segment, Subpath};
///
/// let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
/// let square = Subpath {
///     start: Point3::origin(),
///     segments: corners
///         .windows(2)
///         .map(|w| Segment::Line([Point3::new(w[0].0, w[0].1, 0.0), Point3::new(w[1].0, w[1].1, 0.0)]))
///         .collect(),
///     closed: true,
/// };
/// let mut pyramid = PathFan::new().with_height(1.0).cone(&square).unwrap();
/// pyramid.append_surface(&PathFan::new().cap(&square).unwrap());
/// assert!(pyramid.is_closed_manifold());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathFan {
    apex: Option<Point3>,
    center: Option<Point3>,
    height: f64,
    tag: Option<String>,
}

impl PathFan {
    /// Flat fan from the path's centroid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan to `apex`, ignoring center and height.
    pub fn with_apex(mut self, apex: Point3) -> Self {
        self.apex = Some(apex);
        self
    }

    /// Measure the height from `center` instead of the path centroid.
    pub fn with_center(mut self, center: Point3) -> Self {
        self.center = Some(center);
        self
    }

    /// Distance of the fan point from the center along the normal.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Tag every patch produced by this fan.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Cone over `path` in its traversal direction.
    ///
    /// Over a closed path the patch normals point along the right-hand
    /// normal of the path, and a positive height raises the apex on that
    /// side. Open paths give an open fan.
    pub fn cone(&self, path: &Subpath) -> Result<Surface> {
        let apex = self.fan_point(path, 1.0)?;
        let mut surface = Surface::new();
        for curve in path_curves(path)? {
            surface.append(self.tagged(Patch::cubic_vertex(&curve, &apex)?));
        }
        tracing::debug!(patches = surface.size(), "built cone");
        Ok(surface)
    }

    /// Cap that closes the hole bounded by the closed loop `path`.
    ///
    /// The cap runs the loop backwards, so its edges pair with the edges
    /// that produced the loop and its normals continue their orientation.
    /// A positive height bulges the cap outwards.
    pub fn cap(&self, path: &Subpath) -> Result<Surface> {
        if !path.closed {
            return Err(KernelError::OpenPath);
        }
        let apex = self.fan_point(path, -1.0)?;
        let mut surface = Surface::new();
        for curve in path_curves(path)? {
            let reversed = [curve[3], curve[2], curve[1], curve[0]];
            surface.append(self.tagged(Patch::cubic_vertex(&reversed, &apex)?));
        }
        tracing::debug!(patches = surface.size(), "built cap");
        Ok(surface)
    }

    /// One cap per loop of `boundary`. Fails on open chains.
    pub fn cap_boundary(&self, boundary: &BoundaryPath) -> Result<Surface> {
        let mut surface = Surface::new();
        for path in &boundary.subpaths {
            surface.append_surface(&self.cap(path)?);
        }
        Ok(surface)
    }

    /// Append caps for every boundary loop of `surface` and return how
    /// many were added.
    pub fn close(&self, surface: &mut Surface) -> Result<usize> {
        let boundary = surface.boundary();
        let caps = self.cap_boundary(&boundary)?;
        surface.append_surface(&caps);
        Ok(boundary.subpaths.len())
    }

    fn fan_point(&self, path: &Subpath, side: f64) -> Result<Point3> {
        if let Some(apex) = self.apex {
            return Ok(apex);
        }
        let center = match self.center {
            Some(c) => c,
            None => path_center(path)?,
        };
        if self.height == 0.0 {
            return Ok(center);
        }
        let normal = path_normal(path, &center)?;
        Ok(center + normal.into_inner() * (side * self.height))
    }

    fn tagged(&self, patch: Patch) -> Patch {
        match &self.tag {
            Some(tag) => patch.with_tag(tag.clone()),
            None => patch,
        }
    }
}

/// Cubic control points of every segment, plus a straight closing segment
/// when a closed path does not end at its start.
fn path_curves(path: &Subpath) -> Result<Vec<[Point3; 4]>> {
    if path.segments.is_empty() {
        return Err(KernelError::DegeneratePath("path has no segments".into()));
    }
    let mut curves: Vec<[Point3; 4]> = path
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Line([a, b]) => line_to_cubic(a, b),
            Segment::Cubic(points) => *points,
        })
        .collect();
    let end = curves[curves.len() - 1][3];
    if path.closed && end != path.start {
        curves.push(line_to_cubic(&end, &path.start));
    }
    Ok(curves)
}

/// Centroid of `path` weighted by arc length.
pub fn path_center(path: &Subpath) -> Result<Point3> {
    let rule = GaussLegendre::new(CENTER_ORDER)?;
    let mut sums: [KahanAdder; 4] = std::array::from_fn(|_| KahanAdder::new());
    for curve in path_curves(path)? {
        for (&t, &w) in rule.nodes().iter().zip(rule.weights()) {
            let ds = cubic_curve_derivative(&curve, t).norm() * w;
            let p = cubic_curve_point(&curve, t);
            sums[0].add(p.x * ds);
            sums[1].add(p.y * ds);
            sums[2].add(p.z * ds);
            sums[3].add(ds);
        }
    }
    let length = sums[3].sum();
    if !(length > 0.0 && length.is_finite()) {
        return Err(KernelError::DegeneratePath(format!("path length is {length}")));
    }
    Ok(Point3::new(sums[0].sum(), sums[1].sum(), sums[2].sum()) / length)
}

/// Right-hand unit normal of `path` about `center`: the direction of
/// `∮ (P - center) x dP`, the loop's area vector when the path is closed.
pub fn path_normal(path: &Subpath, center: &Point3) -> Result<Dir3> {
    let rule = GaussLegendre::new(NORMAL_ORDER)?;
    let curves = path_curves(path)?;
    let mut sums: [KahanAdder; 3] = std::array::from_fn(|_| KahanAdder::new());
    let mut extent: f64 = 0.0;
    for curve in &curves {
        for p in curve {
            extent = extent.max((p - center).norm());
        }
        for (&t, &w) in rule.nodes().iter().zip(rule.weights()) {
            let r = cubic_curve_point(curve, t) - center;
            let area = r.cross(&cubic_curve_derivative(curve, t)) * w;
            sums[0].add(area.x);
            sums[1].add(area.y);
            sums[2].add(area.z);
        }
    }
    let area = Point3::new(sums[0].sum(), sums[1].sum(), sums[2].sum()).coords;
    Dir3::try_new(area, 1e-12 * extent * extent)
        .ok_or_else(|| KernelError::DegeneratePath("path encloses no area to orient a fan".into()))
}
