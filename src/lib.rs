//! Geometric placement engine for georeferenced overlays on a pannable,
//! zoomable map.
//!
//! The engine turns user interactions into new placement values and never
//! touches pixels on screen (except where crop explicitly rasterizes into a
//! new buffer):
//!
//! - [editor] — drag state machine for move/resize/rotate/pivot edits of a
//!   [TransformModel], driven by pointer positions and a per-frame
//!   [PlaneProjection].
//! - [solve_alignment] — 2-point conformal and 3-point least-squares
//!   similarity fits from corner/map point correspondences.
//! - [crop_rectangular] / [crop_lasso] — rotation-aware crops projected back
//!   into source-asset pixel space.
//! - [SnapIndex] — advisory nearest-vertex/nearest-edge snapping against a
//!   reference polygon dataset.

extern crate static_aabb2d_index;

mod align;
mod crop;
mod geo;
mod projection;
mod snap;
mod transform;

pub mod core;
pub mod editor;

pub use crate::core::math::Vector2;

pub use crate::align::*;
pub use crate::crop::*;
pub use crate::geo::*;
pub use crate::projection::*;
pub use crate::snap::*;
pub use crate::transform::*;
