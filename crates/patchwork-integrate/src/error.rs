//! Error types for surface integration.

use patchwork_surface::SurfaceError;
use thiserror::Error;

/// Errors that can occur when integrating over a surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// Reading the surface failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// A flux integral was requested over a two-sided surface.
    #[error("flux integrals need an oriented surface")]
    NotOriented,

    /// Mass properties were requested for a surface that does not enclose
    /// a volume.
    #[error("surface is not a closed manifold")]
    NotClosedManifold,

    /// The enclosed volume is zero, so normalized quantities are undefined.
    #[error("enclosed volume is zero")]
    ZeroVolume,

    /// A batched integral was given no integrands.
    #[error("batched integral has no fields")]
    NoFields,

    /// Integration options are out of range.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A Gauss-Legendre rule was requested with zero points.
    #[error("quadrature order must be at least 1, got {0}")]
    InvalidQuadratureOrder(usize),
}

/// Result type for integration operations.
pub type Result<T> = std::result::Result<T, IntegrationError>;
