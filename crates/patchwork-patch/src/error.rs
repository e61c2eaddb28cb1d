//! Error types for patch construction.

use thiserror::Error;

use crate::PatchKind;

/// Errors that can occur when building patches or curves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    /// Control-point buffer is shorter than the patch kind requires.
    #[error("{kind} needs {needed} coordinates, got {got}")]
    BufferTooSmall {
        /// Kind being constructed.
        kind: PatchKind,
        /// Coordinates required.
        needed: usize,
        /// Coordinates supplied.
        got: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("coordinate {index} is not finite")]
    NonFinite {
        /// Index of the offending coordinate.
        index: usize,
    },

    /// Curve has fewer control points than its degree requires.
    #[error("degree {degree} curve needs {} control points, got {got}", degree + 1)]
    CurveTooShort {
        /// Declared curve degree.
        degree: usize,
        /// Control points supplied.
        got: usize,
    },
}

/// Result type for patch operations.
pub type Result<T> = std::result::Result<T, PatchError>;
