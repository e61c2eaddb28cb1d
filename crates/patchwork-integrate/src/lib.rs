#![warn(missing_docs)]

//! Numerical integration over patch surfaces.
//!
//! Integrands are evaluated with Gauss-Legendre rules on each patch and
//! summed with compensated addition. Every integral comes in a sequential
//! form and a parallel form that splits the surface iterator into
//! contiguous ranges and reduces them in order on the rayon pool.
//!
//! On top of the generic [`SurfaceIntegral`] machinery this crate provides
//! area, enclosed volume, center of mass and second moments through the
//! divergence theorem, plus the [`MassProperties`] extension trait for
//! [`Surface`](patchwork_surface::Surface).

pub mod error;
mod integral;
mod mass;
mod options;
mod parallel;
pub mod quadrature;

pub use error::{IntegrationError, Result};
pub use integral::{BatchedIntegral, Field, QuadratureOrders, ScalarField, SurfaceIntegral, VectorField};
pub use mass::{
    area, area_parallel, area_parallel_with_orders, area_with_orders, center_of_mass_of, moments_of, principal_axes,
    principal_moments, to_moments_of_inertia, volume, volume_parallel, volume_parallel_with_orders, volume_with_orders,
    MassProperties,
};
pub use options::{
    default_partitions, CenterOfMassOptions, IntegrationOptions, MeasureOrders, MomentOptions, MAX_MEASURE_ORDER,
    MIN_PARALLEL_SIZE_CM, MIN_PARALLEL_SIZE_M, MIN_PARTITION_SIZE,
};
pub use quadrature::{GaussLegendre, QuadPoint, SquareRule, TriangleRule};
