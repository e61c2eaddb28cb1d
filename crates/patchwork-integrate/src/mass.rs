//! Area, volume and mass properties of closed surfaces.
//!
//! Volume integrals are turned into surface integrals with the divergence
//! theorem: for a field `F` with `div F = g`, `∫ g dV = ∫∫ F · n dA` over
//! the outward-oriented boundary.

use patchwork_math::{Dir3, KahanAdder, Mat3, Point3, Transform, Vec3};
use patchwork_patch::{evaluate, normal, PatchKind};
use patchwork_surface::{Surface, SurfaceIterator};

use crate::error::{IntegrationError, Result};
use crate::integral::{quadrature_sum, with_integrable, BatchedIntegral, SurfaceIntegral};
use crate::options::{CenterOfMassOptions, MeasureOrders, MomentOptions, MIN_PARALLEL_SIZE_CM, MIN_PARALLEL_SIZE_M};
use crate::parallel::{accumulate, sum_partitions};
use crate::quadrature::{SquareRule, TriangleRule};

// =============================================================================
// Area
// =============================================================================

struct AreaRules {
    square: SquareRule,
    triangle: TriangleRule,
}

impl AreaRules {
    fn new(orders: &MeasureOrders) -> Result<Self> {
        orders.validate()?;
        Ok(Self {
            square: SquareRule::new(orders.area_patch)?,
            triangle: TriangleRule::new(orders.area_triangle)?,
        })
    }

    fn patch_area(&self, kind: PatchKind, coords: &[f64]) -> f64 {
        match kind {
            PatchKind::PlanarTriangle => normal(kind, coords, 0.0, 0.0).norm() / 2.0,
            PatchKind::CubicTriangle => {
                quadrature_sum(kind, coords, self.triangle.points(), |_, n| n.norm())
            }
            PatchKind::CubicPatch | PatchKind::CubicVertex => with_integrable(kind, coords, |kind, c| {
                quadrature_sum(kind, c, self.square.points(), |_, n| n.norm())
            }),
        }
    }
}

/// Total area of every patch of `iter`.
pub fn area(iter: impl SurfaceIterator) -> Result<f64> {
    area_with_orders(iter, &MeasureOrders::default())
}

/// [`area`] with explicit quadrature orders.
pub fn area_with_orders(mut iter: impl SurfaceIterator, orders: &MeasureOrders) -> Result<f64> {
    let rules = AreaRules::new(orders)?;
    let sums = accumulate(&mut iter, 1, |c, kind, a| {
        a[0].add(rules.patch_area(kind, c));
        Ok(())
    })?;
    Ok(sums.iter().map(KahanAdder::sum).sum())
}

/// [`area`] computed over `partitions` parallel ranges.
pub fn area_parallel(iter: impl SurfaceIterator, partitions: usize) -> Result<f64> {
    area_parallel_with_orders(iter, partitions, &MeasureOrders::default())
}

/// [`area_parallel`] with explicit quadrature orders.
pub fn area_parallel_with_orders(
    iter: impl SurfaceIterator,
    partitions: usize,
    orders: &MeasureOrders,
) -> Result<f64> {
    let rules = AreaRules::new(orders)?;
    let sums = sum_partitions(iter, partitions, 1, |cursor| {
        accumulate(cursor, 1, |c, kind, a| {
            a[0].add(rules.patch_area(kind, c));
            Ok(())
        })
    })?;
    Ok(sums.iter().sum())
}

// =============================================================================
// Volume
// =============================================================================

struct VolumeRules {
    square: SquareRule,
    triangle: TriangleRule,
    reference: Point3,
}

impl VolumeRules {
    fn new(reference: &Point3, orders: &MeasureOrders) -> Result<Self> {
        orders.validate()?;
        Ok(Self {
            square: SquareRule::new(orders.volume_patch)?,
            triangle: TriangleRule::new(orders.volume_triangle)?,
            reference: *reference,
        })
    }

    /// `(1/3) ∫∫ (P - ref) · (tu x tv)` over one patch.
    fn patch_volume(&self, kind: PatchKind, coords: &[f64]) -> f64 {
        let flux = |p: &Point3, n: &Vec3| (p - self.reference).dot(n);
        match kind {
            PatchKind::PlanarTriangle => {
                let p0 = evaluate(kind, coords, 0.0, 0.0);
                flux(&p0, &normal(kind, coords, 0.0, 0.0)) / 6.0
            }
            PatchKind::CubicTriangle => quadrature_sum(kind, coords, self.triangle.points(), flux) / 3.0,
            PatchKind::CubicPatch | PatchKind::CubicVertex => with_integrable(kind, coords, |kind, c| {
                quadrature_sum(kind, c, self.square.points(), flux) / 3.0
            }),
        }
    }
}

/// Volume enclosed by an oriented surface, measured from `reference`.
///
/// Exact for polynomial patches up to rounding; for a closed manifold the
/// result does not depend on `reference`.
pub fn volume(iter: impl SurfaceIterator, reference: &Point3) -> Result<f64> {
    volume_with_orders(iter, reference, &MeasureOrders::default())
}

/// [`volume`] with explicit quadrature orders.
pub fn volume_with_orders(mut iter: impl SurfaceIterator, reference: &Point3, orders: &MeasureOrders) -> Result<f64> {
    if !iter.is_oriented() {
        return Err(IntegrationError::NotOriented);
    }
    let rules = VolumeRules::new(reference, orders)?;
    let sums = accumulate(&mut iter, 1, |c, kind, a| {
        a[0].add(rules.patch_volume(kind, c));
        Ok(())
    })?;
    Ok(sums.iter().map(KahanAdder::sum).sum())
}

/// [`volume`] computed over `partitions` parallel ranges.
pub fn volume_parallel(iter: impl SurfaceIterator, reference: &Point3, partitions: usize) -> Result<f64> {
    volume_parallel_with_orders(iter, reference, partitions, &MeasureOrders::default())
}

/// [`volume_parallel`] with explicit quadrature orders.
pub fn volume_parallel_with_orders(
    iter: impl SurfaceIterator,
    reference: &Point3,
    partitions: usize,
    orders: &MeasureOrders,
) -> Result<f64> {
    if !iter.is_oriented() {
        return Err(IntegrationError::NotOriented);
    }
    let rules = VolumeRules::new(reference, orders)?;
    let sums = sum_partitions(iter, partitions, 1, |cursor| {
        accumulate(cursor, 1, |c, kind, a| {
            a[0].add(rules.patch_volume(kind, c));
            Ok(())
        })
    })?;
    Ok(sums.iter().sum())
}

// =============================================================================
// Mass properties
// =============================================================================

fn require_closed(surface: &Surface) -> Result<()> {
    if !surface.is_oriented() {
        return Err(IntegrationError::NotOriented);
    }
    if !surface.is_closed_manifold() {
        tracing::warn!(patches = surface.size(), "mass properties requested for a surface with boundary");
        return Err(IntegrationError::NotClosedManifold);
    }
    Ok(())
}

fn volume_integral() -> Result<SurfaceIntegral> {
    SurfaceIntegral::vector(1, |p| p.coords / 3.0)
}

fn run_batch(
    surface: &Surface,
    shift: Transform,
    integrals: Vec<SurfaceIntegral>,
    partitions: Option<usize>,
) -> Result<Vec<f64>> {
    let batch = BatchedIntegral::new(integrals)?;
    let iter = surface.iter_transformed(shift);
    match partitions {
        Some(n) => batch.integrate_parallel(iter, n),
        None => batch.integrate(iter),
    }
}

/// Center of mass of the solid bounded by an oriented closed surface.
///
/// The surface is moved so its bounding-box center sits at the origin,
/// the first moments `∫ x dV`, `∫ y dV`, `∫ z dV` are integrated through
/// the fields `(0, xy, 0)`, `(0, 0, yz)` and `(zx, 0, 0)`, divided by the
/// volume and moved back.
pub fn center_of_mass_of(surface: &Surface, options: &CenterOfMassOptions) -> Result<Point3> {
    options.integration.validate()?;
    if options.volume == Some(0.0) {
        return Err(IntegrationError::ZeroVolume);
    }
    require_closed(surface)?;
    let center = surface.bounds().ok_or(IntegrationError::ZeroVolume)?.center();
    let shift = Transform::translation(-center.x, -center.y, -center.z);
    let limit = options.integration.flatness_limit;

    let mut integrals = vec![
        SurfaceIntegral::vector(2, |p| Vec3::new(0.0, p.x * p.y, 0.0))?,
        SurfaceIntegral::vector(2, |p| Vec3::new(0.0, 0.0, p.y * p.z))?,
        SurfaceIntegral::vector(2, |p| Vec3::new(p.z * p.x, 0.0, 0.0))?,
    ];
    if options.volume.is_none() {
        integrals.push(volume_integral()?);
    }
    let integrals = integrals.into_iter().map(|i| i.with_flatness_limit(limit)).collect();
    let plan = options.integration.plan(surface.size(), MIN_PARALLEL_SIZE_CM);
    let values = run_batch(surface, shift, integrals, plan)?;

    let vol = options.volume.or_else(|| values.get(3).copied()).unwrap_or(0.0);
    if vol == 0.0 {
        return Err(IntegrationError::ZeroVolume);
    }
    Ok(center + Vec3::new(values[0], values[1], values[2]) / vol)
}

/// Normalized second moments `M_ij = ∫ (x_i - c_i)(x_j - c_j) dV / V`
/// about `center`.
///
/// A computed volume of zero gives the zero matrix; an explicit
/// `options.volume` of zero is an error.
pub fn moments_of(surface: &Surface, center: &Point3, options: &MomentOptions) -> Result<Mat3> {
    options.integration.validate()?;
    if options.volume == Some(0.0) {
        return Err(IntegrationError::ZeroVolume);
    }
    require_closed(surface)?;
    let shift = Transform::translation(-center.x, -center.y, -center.z);
    let limit = options.integration.flatness_limit;

    let mut integrals = vec![
        SurfaceIntegral::vector(3, |p| Vec3::new(0.0, p.x * p.x * p.y, 0.0))?,
        SurfaceIntegral::vector(3, |p| Vec3::new(0.0, 0.0, p.y * p.y * p.z))?,
        SurfaceIntegral::vector(3, |p| Vec3::new(p.z * p.z * p.x, 0.0, 0.0))?,
        SurfaceIntegral::vector(3, |p| Vec3::new(0.0, 0.0, p.x * p.y * p.z))?,
        SurfaceIntegral::vector(3, |p| Vec3::new(p.x * p.y * p.z, 0.0, 0.0))?,
        SurfaceIntegral::vector(3, |p| Vec3::new(0.0, p.x * p.y * p.z, 0.0))?,
    ];
    if options.volume.is_none() {
        integrals.push(volume_integral()?);
    }
    let integrals = integrals.into_iter().map(|i| i.with_flatness_limit(limit)).collect();
    let plan = options.integration.plan(surface.size(), MIN_PARALLEL_SIZE_M);
    let v = run_batch(surface, shift, integrals, plan)?;

    let vol = options.volume.or_else(|| v.get(6).copied()).unwrap_or(0.0);
    if vol == 0.0 {
        return Ok(Mat3::zeros());
    }
    let (xx, yy, zz, xy, yz, zx) = (v[0], v[1], v[2], v[3], v[4], v[5]);
    Ok(Mat3::new(xx, xy, zx, xy, yy, yz, zx, yz, zz) / vol)
}

/// Inertia tensor per unit mass from normalized second moments:
/// `I_ii = trace(M) - M_ii`, `I_ij = -M_ij`.
pub fn to_moments_of_inertia(moments: &Mat3) -> Mat3 {
    Mat3::identity() * moments.trace() - moments
}

fn sorted_eigen(tensor: &Mat3) -> [(f64, Vec3); 3] {
    let eigen = nalgebra::SymmetricEigen::new(*tensor);
    let mut pairs: [(f64, Vec3); 3] =
        std::array::from_fn(|k| (eigen.eigenvalues[k], eigen.eigenvectors.column(k).into_owned()));
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));
    pairs
}

/// Principal moments of a symmetric tensor, largest first.
pub fn principal_moments(tensor: &Mat3) -> [f64; 3] {
    sorted_eigen(tensor).map(|(value, _)| value)
}

/// Principal axes matching [`principal_moments`], as a right-handed frame.
pub fn principal_axes(tensor: &Mat3) -> [Dir3; 3] {
    let [(_, a), (_, b), _] = sorted_eigen(tensor);
    [Dir3::new_normalize(a), Dir3::new_normalize(b), Dir3::new_normalize(a.cross(&b))]
}

// =============================================================================
// Extension trait
// =============================================================================

/// Mass properties of a [`Surface`] with default options.
pub trait MassProperties {
    /// Total area.
    fn area(&self) -> Result<f64>;

    /// Total area over `partitions` parallel ranges.
    fn area_parallel(&self, partitions: usize) -> Result<f64>;

    /// Enclosed volume, measured from the bounding-box center.
    fn volume(&self) -> Result<f64>;

    /// Enclosed volume over `partitions` parallel ranges.
    fn volume_parallel(&self, partitions: usize) -> Result<f64>;

    /// Center of mass of the enclosed solid.
    fn center_of_mass(&self) -> Result<Point3>;

    /// Normalized second moments about the center of mass.
    fn moments(&self) -> Result<Mat3>;

    /// Inertia tensor per unit mass about the center of mass.
    fn inertia_tensor(&self) -> Result<Mat3> {
        Ok(to_moments_of_inertia(&self.moments()?))
    }
}

fn volume_reference(surface: &Surface) -> Point3 {
    surface.bounds().map_or_else(Point3::origin, |b| b.center())
}

impl MassProperties for Surface {
    fn area(&self) -> Result<f64> {
        area(self.iter())
    }

    fn area_parallel(&self, partitions: usize) -> Result<f64> {
        area_parallel(self.iter(), partitions)
    }

    fn volume(&self) -> Result<f64> {
        volume(self.iter(), &volume_reference(self))
    }

    fn volume_parallel(&self, partitions: usize) -> Result<f64> {
        volume_parallel(self.iter(), &volume_reference(self), partitions)
    }

    fn center_of_mass(&self) -> Result<Point3> {
        center_of_mass_of(self, &CenterOfMassOptions::default())
    }

    fn moments(&self) -> Result<Mat3> {
        let center = self.center_of_mass()?;
        moments_of(self, &center, &MomentOptions::default())
    }
}
