//! Face adjacency, grouping, and orientation classification.
//!
//! This crate turns a normalized [`unfold_types::TriangleSoup`] into a
//! partition of near-coplanar face groups, each labeled by its orientation
//! relative to a world up axis:
//!
//! - [`are_adjacent`] / [`FaceAdjacency`] - the shared-edge adjacency
//!   relation between faces
//! - [`build_face_groups`] - region growing into [`FaceGroup`]s, seeded in
//!   ascending face order and bounded by an angular threshold against the
//!   seed normal
//! - [`classify_groups`] - label each group [`GroupKind::Top`],
//!   [`GroupKind::Bottom`], or [`GroupKind::Side`] against the up axis
//!
//! # Example
//!
//! ```
//! use unfold_group::{build_face_groups, classify_groups, ClassifyParams, GroupingParams};
//! use unfold_types::TriangleSoup;
//!
//! let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).unwrap();
//! let mut groups = build_face_groups(&soup, &GroupingParams::default()).unwrap();
//! classify_groups(&mut groups, &ClassifyParams::default()).unwrap();
//! assert_eq!(groups.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod classify;
mod error;
mod group;

pub use adjacency::{are_adjacent, FaceAdjacency, DEFAULT_TOLERANCE};
pub use classify::{classify_groups, classify_normal, ClassifyParams, GroupKind};
pub use error::{GroupError, GroupResult};
pub use group::{build_face_groups, FaceGroup, GroupId, GroupSet, GroupingParams};
