#![warn(missing_docs)]

//! Math types for the patchwork surface kernel.
//!
//! Thin wrappers around nalgebra providing the types shared by every
//! patchwork crate: points, vectors, affine transforms, ULP-scaled
//! tolerances, compensated summation and axis-aligned bounds.

mod adder;
mod bbox;
mod tolerance;
mod transform;

use nalgebra::{Unit, Vector3};

pub use adder::KahanAdder;
pub use bbox::BoundingBox;
pub use tolerance::Tolerances;
pub use transform::Transform;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 3x3 matrix, used for second moments and inertia tensors.
pub type Mat3 = nalgebra::Matrix3<f64>;
