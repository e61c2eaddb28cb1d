//! Error types for the facade crate.

use patchwork_integrate::IntegrationError;
use patchwork_patch::PatchError;
use patchwork_surface::SurfaceError;
use thiserror::Error;

/// Errors from configuration loading, grid construction and path fans.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Configuration text is not valid TOML for [`KernelConfig`](crate::KernelConfig).
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Configuration parsed but holds out-of-range values.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Grid dimensions or indices out of range.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// A cap was requested for a boundary path that does not close.
    #[error("cannot cap an open path")]
    OpenPath,

    /// A path has no length, or no area to orient a raised fan.
    #[error("degenerate path: {0}")]
    DegeneratePath(String),

    /// A patch could not be constructed.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// A surface operation failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// An integral failed.
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

impl From<toml::de::Error> for KernelError {
    fn from(err: toml::de::Error) -> Self {
        KernelError::Parse(err.message().to_string())
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, KernelError>;
