//! Core geometry types for the mesh unfolding engine.
//!
//! This crate provides the foundational types shared by every stage of the
//! unfolding pipeline:
//!
//! - [`TriangleSoup`] - canonical non-indexed triangle list (the normalized
//!   mesh every stage reads)
//! - [`Triangle`] - a concrete triangle with vertex positions
//! - [`Aabb`] - axis-aligned bounding box
//!
//! # Coordinate System
//!
//! Right-handed, `f64` coordinates, **Z-up** by convention (the up axis used
//! for group classification is configurable downstream). Face winding is
//! counter-clockwise viewed from outside, so normals point outward.
//!
//! # Normalization
//!
//! Loaders hand the engine either an indexed mesh or a raw triangle soup.
//! [`TriangleSoup::from_buffers`] turns both into the same canonical layout,
//! welding coincident-but-duplicated vertices so that the tolerance-based
//! adjacency tests downstream behave identically for both input forms.
//!
//! # Example
//!
//! ```
//! use unfold_types::TriangleSoup;
//!
//! let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).unwrap();
//! assert_eq!(soup.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod error;
mod soup;
mod triangle;

pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use soup::TriangleSoup;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
