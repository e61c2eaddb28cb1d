#![warn(missing_docs)]

//! Cubic Bezier patch math for the patchwork surface kernel.
//!
//! A [`Patch`] is a [`PatchKind`] tag plus a flat coordinate buffer. The
//! free functions in this crate evaluate positions and tangents, elevate
//! curve degrees, extract canonical boundary edges and test flatness,
//! keyed by kind so that hot integration loops dispatch with one `match`.
//!
//! # Layouts
//!
//! - [`PatchKind::PlanarTriangle`]: P0 (w corner), P1 (v corner), P2 (u
//!   corner); `P(u, v) = w P0 + v P1 + u P2`.
//! - [`PatchKind::CubicTriangle`]: P003, P012, P021, P030, P102, P111,
//!   P120, P201, P210, P300 where `Pijk` weights `u^i v^j w^k`.
//! - [`PatchKind::CubicPatch`]: 4x4 grid, point `(i, j)` at `4 * j + i`.
//! - [`PatchKind::CubicVertex`]: curve C0..C3 then apex A;
//!   `P(u, v) = (1 - v) C(u) + v A`.

mod buf;
pub mod edge;
pub mod elevate;
pub mod error;
pub mod eval;
pub mod flat;
mod patch;

pub use edge::{boundary_edges, Edge};
pub use elevate::{cubic_vertex_to_patch, elevate_degree, line_to_cubic, quadratic_to_cubic};
pub use error::{PatchError, Result};
pub use eval::{evaluate, evaluate_barycentric, normal, u_tangent, v_tangent};
pub use flat::nearly_flat;
pub use patch::{Patch, PatchKind};
