//! Scalar and flux integrals of polynomial fields over surfaces.

use std::fmt;
use std::sync::Arc;

use patchwork_math::{KahanAdder, Point3, Vec3};
use patchwork_patch::{cubic_vertex_to_patch, evaluate, nearly_flat, normal, PatchKind};
use patchwork_surface::SurfaceIterator;

use crate::error::{IntegrationError, Result};
use crate::parallel::{accumulate, sum_partitions};
use crate::quadrature::{QuadPoint, SquareRule, TriangleRule};

/// Scalar field evaluated at surface points.
pub type ScalarField = Arc<dyn Fn(&Point3) -> f64 + Send + Sync>;

/// Vector field evaluated at surface points.
pub type VectorField = Arc<dyn Fn(&Point3) -> Vec3 + Send + Sync>;

/// The integrand of a [`SurfaceIntegral`].
#[derive(Clone)]
pub enum Field {
    /// Integrated against the area element: `∫∫ f |tu x tv|`.
    Scalar(ScalarField),
    /// Integrated as a flux: `∫∫ F · (tu x tv)`.
    Vector(VectorField),
}

impl Field {
    #[inline]
    fn value(&self, p: &Point3, n: &Vec3) -> f64 {
        match self {
            Field::Scalar(f) => f(p) * n.norm(),
            Field::Vector(f) => f(p).dot(n),
        }
    }
}

/// Gauss-Legendre orders for a field of polynomial degree `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadratureOrders {
    /// Bicubic patches and cubic vertices: `ceil((11 + 6n) / 2)`.
    pub cubic_patch: usize,
    /// Cubic triangles: `ceil((7 + 6n) / 2)`.
    pub cubic_triangle: usize,
    /// Planar triangles: `ceil((1 + 6n) / 2)`.
    pub planar_triangle: usize,
    /// Nearly flat patches: `ceil((9 + 4n) / 2)`.
    pub fast_cubic_patch: usize,
    /// Nearly flat cubic triangles: `ceil((5 + 4n) / 2)`.
    pub fast_cubic_triangle: usize,
}

impl QuadratureOrders {
    /// Orders for a field of polynomial degree `degree`.
    pub fn for_degree(degree: u32) -> Self {
        let n = degree as usize;
        Self {
            cubic_patch: (11 + 6 * n).div_ceil(2),
            cubic_triangle: (7 + 6 * n).div_ceil(2),
            planar_triangle: (1 + 6 * n).div_ceil(2),
            fast_cubic_patch: (9 + 4 * n).div_ceil(2),
            fast_cubic_triangle: (5 + 4 * n).div_ceil(2),
        }
    }
}

#[derive(Debug)]
struct Rules {
    patch: SquareRule,
    triangle: TriangleRule,
    planar: TriangleRule,
    fast_patch: SquareRule,
    fast_triangle: TriangleRule,
}

impl Rules {
    fn new(orders: &QuadratureOrders) -> Result<Self> {
        Ok(Self {
            patch: SquareRule::new(orders.cubic_patch)?,
            triangle: TriangleRule::new(orders.cubic_triangle)?,
            planar: TriangleRule::new(orders.planar_triangle)?,
            fast_patch: SquareRule::new(orders.fast_cubic_patch)?,
            fast_triangle: TriangleRule::new(orders.fast_cubic_triangle)?,
        })
    }

    fn points(&self, kind: PatchKind, fast: bool) -> &[QuadPoint] {
        match (kind, fast) {
            (PatchKind::PlanarTriangle, _) => self.planar.points(),
            (PatchKind::CubicTriangle, false) => self.triangle.points(),
            (PatchKind::CubicTriangle, true) => self.fast_triangle.points(),
            (PatchKind::CubicPatch | PatchKind::CubicVertex, false) => self.patch.points(),
            (PatchKind::CubicPatch | PatchKind::CubicVertex, true) => self.fast_patch.points(),
        }
    }
}

/// Call `f` with a kind and buffer that quadrature handles directly:
/// cubic vertices are converted to bicubic patches.
pub(crate) fn with_integrable<R>(kind: PatchKind, coords: &[f64], f: impl FnOnce(PatchKind, &[f64]) -> R) -> R {
    if kind == PatchKind::CubicVertex {
        let grid = cubic_vertex_to_patch(coords);
        f(PatchKind::CubicPatch, &grid)
    } else {
        f(kind, coords)
    }
}

/// `Σ weight · g(P(u, v), tu x tv)` over the rule's points.
pub(crate) fn quadrature_sum(
    kind: PatchKind,
    coords: &[f64],
    points: &[QuadPoint],
    g: impl Fn(&Point3, &Vec3) -> f64,
) -> f64 {
    points
        .iter()
        .map(|q| {
            let p = evaluate(kind, coords, q.u, q.v);
            let n = normal(kind, coords, q.u, q.v);
            q.weight * g(&p, &n)
        })
        .sum()
}

/// An integral of a polynomial field over every patch of a surface.
///
/// Quadrature orders come from the field's polynomial `degree` in the
/// coordinates, so polynomial fields integrate exactly up to rounding.
/// With a flatness limit, patches that pass
/// [`nearly_flat`](patchwork_patch::nearly_flat) use reduced orders.
#[derive(Clone)]
pub struct SurfaceIntegral {
    field: Field,
    degree: u32,
    flatness_limit: Option<f64>,
    rules: Arc<Rules>,
}

impl fmt::Debug for SurfaceIntegral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceIntegral")
            .field("flux", &self.is_flux())
            .field("degree", &self.degree)
            .field("flatness_limit", &self.flatness_limit)
            .finish()
    }
}

impl SurfaceIntegral {
    /// Integral of a field whose components are polynomials of `degree`.
    pub fn new(field: Field, degree: u32) -> Result<Self> {
        let rules = Rules::new(&QuadratureOrders::for_degree(degree))?;
        Ok(Self {
            field,
            degree,
            flatness_limit: None,
            rules: Arc::new(rules),
        })
    }

    /// `∫∫ f dA` for a scalar field.
    pub fn scalar(degree: u32, f: impl Fn(&Point3) -> f64 + Send + Sync + 'static) -> Result<Self> {
        Self::new(Field::Scalar(Arc::new(f)), degree)
    }

    /// `∫∫ F · n dA` for a vector field.
    pub fn vector(degree: u32, f: impl Fn(&Point3) -> Vec3 + Send + Sync + 'static) -> Result<Self> {
        Self::new(Field::Vector(Arc::new(f)), degree)
    }

    /// Use reduced orders on patches flatter than `limit`.
    pub fn with_flatness_limit(mut self, limit: Option<f64>) -> Self {
        self.flatness_limit = limit;
        self
    }

    /// Polynomial degree of the field.
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// True for a flux integral, which needs an oriented surface.
    pub fn is_flux(&self) -> bool {
        matches!(self.field, Field::Vector(_))
    }

    /// This integral's contribution from one patch.
    pub fn patch_value(&self, kind: PatchKind, coords: &[f64]) -> f64 {
        with_integrable(kind, coords, |kind, c| {
            let fast = kind != PatchKind::PlanarTriangle
                && self.flatness_limit.is_some_and(|limit| nearly_flat(kind, c, limit));
            quadrature_sum(kind, c, self.rules.points(kind, fast), |p, n| self.field.value(p, n))
        })
    }

    /// Integrate over every patch of `iter`.
    pub fn integrate(&self, iter: impl SurfaceIterator) -> Result<f64> {
        Ok(first(run(std::slice::from_ref(self), iter, None)?))
    }

    /// Integrate over `iter` split into `partitions` parallel ranges.
    pub fn integrate_parallel(&self, iter: impl SurfaceIterator, partitions: usize) -> Result<f64> {
        Ok(first(run(std::slice::from_ref(self), iter, Some(partitions))?))
    }
}

fn first(values: Vec<f64>) -> f64 {
    values.into_iter().next().unwrap_or(0.0)
}

/// Several integrals evaluated in one traversal of a surface.
#[derive(Debug, Clone)]
pub struct BatchedIntegral {
    integrals: Vec<SurfaceIntegral>,
}

impl BatchedIntegral {
    /// Batch `integrals`; at least one is required.
    pub fn new(integrals: Vec<SurfaceIntegral>) -> Result<Self> {
        if integrals.is_empty() {
            return Err(IntegrationError::NoFields);
        }
        Ok(Self { integrals })
    }

    /// Number of integrals.
    pub fn len(&self) -> usize {
        self.integrals.len()
    }

    /// Always false; an empty batch cannot be built.
    pub fn is_empty(&self) -> bool {
        self.integrals.is_empty()
    }

    /// One value per integral, in order.
    pub fn integrate(&self, iter: impl SurfaceIterator) -> Result<Vec<f64>> {
        run(&self.integrals, iter, None)
    }

    /// One value per integral, computed over `partitions` parallel ranges.
    pub fn integrate_parallel(&self, iter: impl SurfaceIterator, partitions: usize) -> Result<Vec<f64>> {
        run(&self.integrals, iter, Some(partitions))
    }
}

fn run(integrals: &[SurfaceIntegral], mut iter: impl SurfaceIterator, partitions: Option<usize>) -> Result<Vec<f64>> {
    if integrals.iter().any(SurfaceIntegral::is_flux) && !iter.is_oriented() {
        return Err(IntegrationError::NotOriented);
    }
    let width = integrals.len();
    let per_patch = |coords: &[f64], kind: PatchKind, adders: &mut [KahanAdder]| -> Result<()> {
        for (integral, adder) in integrals.iter().zip(adders.iter_mut()) {
            adder.add(integral.patch_value(kind, coords));
        }
        Ok(())
    };
    match partitions {
        None => Ok(accumulate(&mut iter, width, &per_patch)?
            .iter()
            .map(KahanAdder::sum)
            .collect()),
        Some(n) => sum_partitions(iter, n, width, |cursor| accumulate(cursor, width, &per_patch)),
    }
}
