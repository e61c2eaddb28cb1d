#![warn(missing_docs)]

//! Surfaces built from cubic patches, their topology and iteration.
//!
//! A [`Surface`] owns an ordered list of patches. Topology queries match
//! canonical boundary edges between patches to report manifold
//! violations, extract the boundary as a [`BoundaryPath`] and split the
//! surface into edge-connected components.
//!
//! Consumers read surfaces through the forward-only [`SurfaceIterator`]
//! protocol. [`SubdivisionIterator`] refines any iterator on the fly and
//! [`SurfaceIteratorSplitter`] partitions one for parallel work.

mod boundary;
pub mod error;
mod iter;
mod splitter;
mod subdivide;
mod surface;
mod topology;

pub use boundary::{BoundaryPath, Segment, Subpath};
pub use error::{Result, SurfaceError};
pub use iter::{count_patches, Patches, SurfaceCursor, SurfaceIterator};
pub use splitter::SurfaceIteratorSplitter;
pub use subdivide::SubdivisionIterator;
pub use surface::Surface;
pub use topology::TopologyIssue;
