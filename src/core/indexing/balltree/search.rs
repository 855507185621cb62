// src/core/indexing/balltree/search.rs

//! Range and k-nearest-neighbor search over a built ball tree.
//!
//! Both searches rely on the triangle inequality: for a node with center `c`
//! and radius `r`, every element `x` of its subtree satisfies
//! `d(c, q) - r <= d(x, q) <= d(c, q) + r`.

use super::candidates::{BoundedCandidates, Neighbor};
use super::error::{checked_distance, BallTreeError};
use super::stats::QueryStats;
use super::tree::{NodeArena, NodeId};
use crate::core::dataset::{DataSet, ElementId};
use crate::core::metric::Metric;

fn payload<T>(data: &DataSet<T>, id: ElementId) -> Result<&T, BallTreeError> {
    data.get(id).ok_or(BallTreeError::ElementNotFound(id))
}

/// Every element strictly closer than `radius` to `center`, in ascending ID order.
///
/// # Errors
/// `InvalidQuery` for a negative or NaN radius, `InvalidDistance` when the
/// metric misbehaves.
pub(super) fn sphere_query<T, M: Metric<T>>(
    arena: &NodeArena<T>,
    data: &DataSet<T>,
    metric: &M,
    center: &T,
    radius: f64,
) -> Result<(Vec<ElementId>, QueryStats), BallTreeError> {
    if radius.is_nan() || radius < 0.0 {
        return Err(BallTreeError::InvalidQuery(format!(
            "sphere radius must be a non-negative number, got {}",
            radius
        )));
    }

    let mut stats = QueryStats::default();
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = arena.root().into_iter().collect();

    while let Some(id) = stack.pop() {
        let node = arena.node(id);
        stats.nodes_visited += 1;
        stats.distance_computations += 1;
        let to_center = checked_distance(metric.distance(node.center(), center), "sphere center")?;

        if to_center > radius + node.radius() {
            stats.nodes_pruned += 1;
            continue;
        }
        if to_center + node.radius() < radius {
            stats.subtrees_reported += 1;
            arena.collect_subtree(id, &mut found);
            continue;
        }

        stats.distance_computations += 1;
        let rep = payload(data, node.representative())?;
        if checked_distance(metric.distance(rep, center), "sphere representative")? < radius {
            found.extend(node.elements());
        }
        stack.extend(node.children());
    }

    found.sort_unstable();
    Ok((found, stats))
}

/// The `k` elements closest to `query`, closest first.
///
/// Returns fewer than `k` neighbors when the tree holds fewer elements.
///
/// # Errors
/// `InvalidDistance` when the metric misbehaves.
pub(super) fn knn_query<T, M: Metric<T>>(
    arena: &NodeArena<T>,
    data: &DataSet<T>,
    metric: &M,
    query: &T,
    k: usize,
) -> Result<(Vec<Neighbor>, QueryStats), BallTreeError> {
    let mut stats = QueryStats::default();
    if k == 0 {
        return Ok((Vec::new(), stats));
    }

    let mut candidates = BoundedCandidates::new(k);
    // (node, lower bound on the distance of any element in its subtree)
    let mut stack: Vec<(NodeId, f64)> =
        arena.root().map(|root| (root, f64::NEG_INFINITY)).into_iter().collect();

    while let Some((id, bound)) = stack.pop() {
        // The bound may have tightened since this node was pushed.
        if candidates.excludes(bound) {
            stats.nodes_pruned += 1;
            continue;
        }
        stats.nodes_visited += 1;
        let node = arena.node(id);

        stats.distance_computations += 1;
        let rep = payload(data, node.representative())?;
        let to_rep = checked_distance(metric.distance(rep, query), "knn representative")?;
        if candidates.offer(node.representative(), to_rep) {
            for &equivalent in node.equivalents() {
                if !candidates.offer(equivalent, to_rep) {
                    break;
                }
            }
        }

        let mut children: Vec<(NodeId, f64, f64)> = Vec::with_capacity(2);
        for child_id in node.children() {
            let child = arena.node(child_id);
            stats.distance_computations += 1;
            let to_center = checked_distance(metric.distance(child.center(), query), "knn child center")?;
            let child_bound = to_center - child.radius();
            if candidates.excludes(child_bound) {
                stats.nodes_pruned += 1;
            } else {
                children.push((child_id, to_center, child_bound));
            }
        }

        // Farther child goes on the stack first so the closer one is popped next.
        children.sort_by(|a, b| b.1.total_cmp(&a.1));
        stack.extend(children.into_iter().map(|(child_id, _, child_bound)| (child_id, child_bound)));
    }

    Ok((candidates.into_neighbors(), stats))
}
