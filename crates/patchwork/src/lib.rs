#![warn(missing_docs)]

//! patchwork: a kernel for surfaces made of cubic Bezier patches.
//!
//! Surfaces are assembled from planar triangles, cubic Bezier triangles,
//! bicubic patches and cubic vertices. The kernel checks them for manifold
//! defects, extracts boundaries and components, subdivides them on the fly
//! and integrates over them to get area, volume, center of mass and
//! inertia, sequentially or on the rayon pool. [`PathFan`] fans cones
//! and caps from boundary paths to close open surfaces.
//!
//! # Example
//!
//! ```rust
//! use patchwork::{MassProperties, PatchGrid, Point3};
//!
//! // unit square sheet made of 2x2 flat bicubic patches
//! let grid = PatchGrid::from_fn(2, 2, |i, j| Point3::new(i as f64 / 6.0, j as f64 / 6.0, 0.0)).unwrap();
//! let sheet = grid.to_surface().unwrap();
//! assert!(sheet.is_well_formed());
//! assert!((sheet.area().unwrap() - 1.0).abs() < 1e-12);
//! ```

mod cap;
mod config;
pub mod error;
mod grid;

pub use cap::{path_center, path_normal, PathFan};
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use grid::PatchGrid;

pub use patchwork_integrate as integrate;
pub use patchwork_math as math;
pub use patchwork_patch as patch;
pub use patchwork_subdiv as subdiv;
pub use patchwork_surface as surface;

pub use patchwork_integrate::{
    area, area_parallel, area_parallel_with_orders, area_with_orders, center_of_mass_of, moments_of, principal_axes,
    principal_moments, to_moments_of_inertia, volume, volume_parallel, volume_parallel_with_orders, volume_with_orders,
    BatchedIntegral, CenterOfMassOptions, Field, IntegrationError, IntegrationOptions, MassProperties, MeasureOrders,
    MomentOptions, SurfaceIntegral,
};
pub use patchwork_math::{BoundingBox, Dir3, KahanAdder, Mat3, Point3, Tolerances, Transform, Vec3};
pub use patchwork_patch::{Edge, Patch, PatchError, PatchKind};
pub use patchwork_subdiv::quarter;
pub use patchwork_surface::{
    BoundaryPath, Segment, Subpath, SubdivisionIterator, Surface, SurfaceCursor, SurfaceError, SurfaceIterator,
    SurfaceIteratorSplitter, TopologyIssue,
};
