//! Error types for surfaces and surface iterators.

use patchwork_patch::{PatchError, PatchKind};
use thiserror::Error;

/// Errors that can occur when building or traversing surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// A patch could not be constructed.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Caller's buffer cannot hold the current patch.
    #[error("buffer holds {got} coordinates, current {kind} needs {needed}")]
    BufferTooSmall {
        /// Kind of the current patch.
        kind: PatchKind,
        /// Coordinates required.
        needed: usize,
        /// Coordinates the buffer holds.
        got: usize,
    },

    /// The iterator has no current patch.
    #[error("surface iterator is exhausted")]
    IteratorExhausted,

    /// A splitter was asked for zero partitions.
    #[error("partition count must be at least 1")]
    InvalidPartitionCount,

    /// Component index past the number of components.
    #[error("component {index} out of range, surface has {count}")]
    ComponentOutOfRange {
        /// Requested component.
        index: usize,
        /// Number of components.
        count: usize,
    },
}

/// Result type for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;
