//! Unfold-order planning.
//!
//! Picks a root group and walks the connectivity graph into a spanning
//! tree. The resulting plan lists groups in placement order, each with the
//! parent it folds out from; groups the walk cannot reach are reported as
//! unplaced rather than silently dropped.

use std::collections::VecDeque;

use nalgebra::Vector3;
use tracing::{debug, warn};
use unfold_group::{GroupId, GroupKind, GroupSet};

use crate::error::{GraphError, GraphResult};
use crate::graph::ConnectivityGraph;

/// How the root group is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootPolicy {
    /// The side group with the lowest id.
    #[default]
    FirstSide,
    /// The group whose centroid sits highest along the up axis.
    HighestCentroid,
    /// The group whose centroid sits lowest along the up axis.
    LowestCentroid,
}

/// How the spanning tree is traversed from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalStrategy {
    /// Breadth-first over all groups.
    #[default]
    Bfs,
    /// Depth-first over side groups only, then the first top and first
    /// bottom group hanging off a visited side group are appended.
    DfsSideChain,
}

/// Parameters for unfold planning.
#[derive(Debug, Clone)]
pub struct PlanParams {
    /// Root selection policy.
    pub root: RootPolicy,
    /// Traversal strategy.
    pub strategy: TraversalStrategy,
    /// Up axis used by the centroid-height root policies.
    pub up_axis: Vector3<f64>,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            root: RootPolicy::default(),
            strategy: TraversalStrategy::default(),
            up_axis: Vector3::z(),
        }
    }
}

impl PlanParams {
    /// Set the root policy.
    #[must_use]
    pub fn with_root(mut self, root: RootPolicy) -> Self {
        self.root = root;
        self
    }

    /// Set the traversal strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: TraversalStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the up axis.
    #[must_use]
    pub fn with_up_axis(mut self, up_axis: Vector3<f64>) -> Self {
        self.up_axis = up_axis;
        self
    }
}

/// One step of the unfold order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanEntry {
    /// The group to place.
    pub group: GroupId,
    /// The already-placed group it folds out from. `None` only for the root.
    pub parent: Option<GroupId>,
}

/// The ordered unfold plan plus the groups it could not reach.
#[derive(Debug, Clone, Default)]
pub struct UnfoldPlan {
    entries: Vec<PlanEntry>,
    unplaced: Vec<GroupId>,
}

impl UnfoldPlan {
    /// Placement steps in order. The first entry, if any, is the root.
    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Groups the traversal never reached, ascending.
    #[must_use]
    pub fn unplaced(&self) -> &[GroupId] {
        &self.unplaced
    }

    /// The root group, if a root was found.
    #[must_use]
    pub fn root(&self) -> Option<GroupId> {
        self.entries.first().map(|e| e.group)
    }

    /// Number of placement steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan places nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Plan the unfold order for a grouped, connected mesh.
///
/// Every entry except the first names a parent that appears earlier in the
/// plan, so placement can proceed left to right. If no root qualifies under
/// the policy the plan is empty and every group is unplaced; that is a
/// warning, not an error.
///
/// # Errors
///
/// Returns an error if the graph was built from a different group set
/// (group counts disagree).
pub fn plan_unfold(
    groups: &GroupSet,
    graph: &ConnectivityGraph,
    params: &PlanParams,
) -> GraphResult<UnfoldPlan> {
    if graph.group_count() != groups.len() {
        return Err(GraphError::GroupCountMismatch {
            graph_groups: graph.group_count(),
            set_groups: groups.len(),
        });
    }

    let Some(root) = select_root(groups, params) else {
        if !groups.is_empty() {
            warn!(
                policy = ?params.root,
                groups = groups.len(),
                "no root group qualifies; leaving every group unplaced"
            );
        }
        return Ok(UnfoldPlan {
            entries: Vec::new(),
            unplaced: (0..groups.len()).collect(),
        });
    };

    let entries = match params.strategy {
        TraversalStrategy::Bfs => breadth_first(graph, root),
        TraversalStrategy::DfsSideChain => side_chain(groups, graph, root),
    };

    let mut placed = vec![false; groups.len()];
    for entry in &entries {
        placed[entry.group] = true;
    }
    let unplaced: Vec<GroupId> = (0..groups.len()).filter(|&g| !placed[g]).collect();
    if !unplaced.is_empty() {
        warn!(
            root,
            unplaced = unplaced.len(),
            "some groups are unreachable from the root"
        );
    }
    debug!(root, placed = entries.len(), strategy = ?params.strategy, "unfold plan ready");

    Ok(UnfoldPlan { entries, unplaced })
}

fn select_root(groups: &GroupSet, params: &PlanParams) -> Option<GroupId> {
    match params.root {
        RootPolicy::FirstSide => groups.iter().find(|g| g.kind.is_side()).map(|g| g.id),
        RootPolicy::HighestCentroid => extremal_root(groups, &params.up_axis, true),
        RootPolicy::LowestCentroid => extremal_root(groups, &params.up_axis, false),
    }
}

/// Group with the extremal centroid height; ties go to the lower id.
fn extremal_root(groups: &GroupSet, up: &Vector3<f64>, highest: bool) -> Option<GroupId> {
    let mut best: Option<(GroupId, f64)> = None;
    for g in groups.iter() {
        let height = g.centroid.coords.dot(up);
        let better = match best {
            None => true,
            Some((_, h)) => {
                if highest {
                    height > h
                } else {
                    height < h
                }
            }
        };
        if better {
            best = Some((g.id, height));
        }
    }
    best.map(|(id, _)| id)
}

fn breadth_first(graph: &ConnectivityGraph, root: GroupId) -> Vec<PlanEntry> {
    let mut visited = vec![false; graph.group_count()];
    let mut entries = vec![PlanEntry {
        group: root,
        parent: None,
    }];
    visited[root] = true;

    let mut queue = VecDeque::from([root]);
    while let Some(group) = queue.pop_front() {
        for connection in graph.neighbors(group) {
            let next = connection.neighbor;
            if !visited[next] {
                visited[next] = true;
                entries.push(PlanEntry {
                    group: next,
                    parent: Some(group),
                });
                queue.push_back(next);
            }
        }
    }
    entries
}

/// Depth-first over side groups, then one top and one bottom cap.
///
/// The cap scan follows plan order, so each cap attaches to the earliest
/// placed side group it touches.
fn side_chain(groups: &GroupSet, graph: &ConnectivityGraph, root: GroupId) -> Vec<PlanEntry> {
    let mut visited = vec![false; graph.group_count()];
    let mut entries = vec![PlanEntry {
        group: root,
        parent: None,
    }];
    visited[root] = true;

    let mut stack = vec![root];
    while let Some(group) = stack.pop() {
        // Reverse order so the lowest-id neighbor is explored first
        for connection in graph.neighbors(group).iter().rev() {
            let next = connection.neighbor;
            let is_side = groups.group(next).is_some_and(|g| g.kind.is_side());
            if is_side && !visited[next] {
                visited[next] = true;
                entries.push(PlanEntry {
                    group: next,
                    parent: Some(group),
                });
                stack.push(next);
            }
        }
    }

    for kind in [GroupKind::Top, GroupKind::Bottom] {
        let attachment = entries.iter().find_map(|entry| {
            graph.neighbors(entry.group).iter().find_map(|connection| {
                let cap = connection.neighbor;
                let matches = !visited[cap]
                    && groups.group(cap).is_some_and(|g| g.kind == kind);
                matches.then_some((cap, entry.group))
            })
        });
        if let Some((cap, parent)) = attachment {
            visited[cap] = true;
            entries.push(PlanEntry {
                group: cap,
                parent: Some(parent),
            });
        }
    }

    entries
}
