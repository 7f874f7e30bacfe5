//! Group connectivity and unfold-order planning.
//!
//! Sits between grouping and layout in the unfolding pipeline:
//!
//! - [`find_shared_edge`] / [`SharedEdge`] - the longest triangle edge two
//!   groups share, used as the fold hinge
//! - [`build_connectivity`] / [`ConnectivityGraph`] - symmetric hinge graph
//!   over all groups
//! - [`plan_unfold`] / [`UnfoldPlan`] - root selection and spanning-tree
//!   traversal producing the placement order, with unreachable groups
//!   reported as unplaced
//!
//! # Example
//!
//! ```
//! use unfold_graph::{build_connectivity, plan_unfold, GraphParams, PlanParams};
//! use unfold_group::{build_face_groups, classify_groups, ClassifyParams, GroupingParams};
//! use unfold_types::TriangleSoup;
//!
//! let positions = [
//!     0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 0.0, // flat base
//!     2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, // folded flap
//! ];
//! let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).unwrap();
//! let mut groups = build_face_groups(&soup, &GroupingParams::default()).unwrap();
//! classify_groups(&mut groups, &ClassifyParams::default()).unwrap();
//! let graph = build_connectivity(&soup, &groups, &GraphParams::default()).unwrap();
//! let plan = plan_unfold(&groups, &graph, &PlanParams::default()).unwrap();
//! assert_eq!(plan.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod edge;
mod error;
mod graph;
mod plan;

pub use edge::{find_shared_edge, SharedEdge};
pub use error::{GraphError, GraphResult};
pub use graph::{build_connectivity, Connection, ConnectivityGraph, GraphParams};
pub use plan::{plan_unfold, PlanEntry, PlanParams, RootPolicy, TraversalStrategy, UnfoldPlan};
