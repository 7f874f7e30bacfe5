//! Flattening, UV projection, and the end-to-end unfolding pipeline.
//!
//! This crate turns a planned unfold into a papercraft net:
//!
//! - [`RigidTransform`] - rotation plus translation, the only motions
//!   placement uses
//! - [`layout_groups`] - folds every planned group flat, pinning each
//!   shared hinge so the net is seamless
//! - [`project_uvs`] - planar texture coordinates per group
//! - [`group_outline`] - cut lines for plotters and renderers
//! - [`UnfoldAnimation`] - eased interpolation for animated unfolds
//! - [`unfold_buffers`] / [`unfold_soup`] - the one-call pipeline
//!
//! # Example
//!
//! ```
//! use unfold_layout::{unfold_buffers, UnfoldParams};
//!
//! // A wall folded up from a flat base
//! let positions = [
//!     2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0,
//!     0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 0.0,
//! ];
//! let net = unfold_buffers(&positions, None, &UnfoldParams::default()).unwrap();
//! assert_eq!(net.placed.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod animate;
mod error;
mod flatten;
mod outline;
mod pipeline;
mod transform;
mod uv;

pub use animate::{ease_out_cubic, UnfoldAnimation};
pub use error::{LayoutError, LayoutResult};
pub use flatten::{
    build_group_geometry, layout_groups, GroupGeometry, GroupLayout, PlacedMesh, TopBottomPolicy,
};
pub use outline::{group_outline, outline_loops};
pub use pipeline::{unfold_buffers, unfold_soup, NetLayout, UnfoldParams, WeldEpsilon};
pub use transform::{rotation_to, RigidTransform};
pub use uv::{project_uvs, UvParams};
