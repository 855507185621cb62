// src/core/indexing/balltree/builder.rs

//! Logic for building a ball tree from a sealed data set.
//!
//! Construction is a greedy two-pivot partition applied top-down. Each node
//! absorbs the elements handed to it, splits the non-equivalent ones between
//! two pivots and passes the halves to its children. Work is driven from an
//! explicit stack, so chain-shaped trees cost heap memory instead of call depth.

use std::marker::PhantomData;

use super::center::Centering;
use super::error::{checked_distance, BallTreeError};
use super::tree::{NodeArena, NodeId, TreeNode};
use crate::core::dataset::{DataSet, ElementId};
use crate::core::metric::Metric;

/// A child that still has to absorb its partition.
pub(super) type PendingNode = (NodeId, Vec<ElementId>);

/// Accumulates nodes into an arena for one build.
pub(super) struct TreeBuilder<'a, T, M, C> {
    data: &'a DataSet<T>,
    metric: &'a M,
    arena: NodeArena<T>,
    _centering: PhantomData<C>,
}

impl<'a, T, M, C> TreeBuilder<'a, T, M, C>
where
    M: Metric<T>,
    C: Centering<T>,
{
    pub(super) fn new(data: &'a DataSet<T>, metric: &'a M) -> Self {
        Self { data, metric, arena: NodeArena::new(data.len()), _centering: PhantomData }
    }

    fn payload(&self, id: ElementId) -> Result<&'a T, BallTreeError> {
        self.data.get(id).ok_or(BallTreeError::ElementNotFound(id))
    }

    fn distance(&self, a: &T, b: &T, context: &'static str) -> Result<f64, BallTreeError> {
        checked_distance(self.metric.distance(a, b), context)
    }

    /// Creates an unpopulated node for `representative` and indexes it.
    pub(super) fn create_node(
        &mut self,
        representative: ElementId,
        parent: Option<NodeId>,
    ) -> Result<NodeId, BallTreeError> {
        let payload = self.payload(representative)?;
        let center = C::center(payload, std::iter::empty(), 1);
        let depth = parent.map_or(0, |p| self.arena.node(p).depth + 1);
        let id = self.arena.push_node(TreeNode::new(representative, center, parent, depth));
        self.arena.register(representative, id)?;
        Ok(id)
    }

    /// Lets `node` absorb `remaining` and creates its children.
    ///
    /// Returns the children that still have to be populated, left first.
    pub(super) fn populate(
        &mut self,
        node: NodeId,
        remaining: &[ElementId],
    ) -> Result<Vec<PendingNode>, BallTreeError> {
        if self.arena.node(node).is_populated() {
            return Err(BallTreeError::NodeAlreadyPopulated(node));
        }

        let representative = self.arena.node(node).representative;
        let rep_payload = self.payload(representative)?;
        let payloads: Vec<&'a T> =
            remaining.iter().map(|&id| self.payload(id)).collect::<Result<_, _>>()?;

        let mut equivalents = Vec::new();
        let mut left: Option<(ElementId, &'a T)> = None;
        let mut right: Option<(ElementId, &'a T)> = None;
        let mut left_list = Vec::new();
        let mut right_list = Vec::new();

        for (&id, &payload) in remaining.iter().zip(payloads.iter()) {
            if self.distance(rep_payload, payload, "representative")? == 0.0 {
                self.arena.register(id, node)?;
                equivalents.push(id);
                continue;
            }

            match (left, right) {
                (None, _) => left = Some((id, payload)),
                (Some((_, left_pivot)), None) => {
                    if self.distance(left_pivot, payload, "left pivot")? == 0.0 {
                        left_list.push(id);
                    } else {
                        right = Some((id, payload));
                    }
                }
                (Some((_, left_pivot)), Some((_, right_pivot))) => {
                    let to_left = self.distance(left_pivot, payload, "left pivot")?;
                    let to_right = self.distance(right_pivot, payload, "right pivot")?;
                    if to_left <= to_right {
                        left_list.push(id);
                    } else {
                        right_list.push(id);
                    }
                }
            }
        }

        let count = remaining.len() + 1;
        let center = C::center(rep_payload, payloads.iter().copied(), count);
        let mut max_sq = checked_distance(self.metric.distance_sq(&center, rep_payload), "radius")?;
        for &payload in &payloads {
            max_sq = max_sq.max(checked_distance(self.metric.distance_sq(&center, payload), "radius")?);
        }

        {
            let entry = self.arena.node_mut(node);
            entry.equivalents = if equivalents.is_empty() { None } else { Some(equivalents) };
            entry.center = center;
            entry.radius = max_sq.sqrt();
            entry.size = count;
            entry.populated = true;
        }

        let mut pending = Vec::with_capacity(2);
        if let Some((pivot, _)) = left {
            let child = self.create_node(pivot, Some(node))?;
            self.arena.node_mut(node).left = Some(child);
            pending.push((child, left_list));
        }
        if let Some((pivot, _)) = right {
            let child = self.create_node(pivot, Some(node))?;
            self.arena.node_mut(node).right = Some(child);
            pending.push((child, right_list));
        }
        Ok(pending)
    }

    /// Populates `root` and all of its descendants.
    pub(super) fn run_from(&mut self, root: NodeId, remaining: Vec<ElementId>) -> Result<(), BallTreeError> {
        let mut stack: Vec<PendingNode> = vec![(root, remaining)];
        while let Some((node, elements)) = stack.pop() {
            let children = self.populate(node, &elements)?;
            // Right is pushed first so the left subtree is finished first.
            stack.extend(children.into_iter().rev());
        }
        Ok(())
    }

    /// Indexes every element of the data set, in ID order.
    pub(super) fn run(mut self) -> Result<NodeArena<T>, BallTreeError> {
        let data = self.data;
        let mut ids = data.ids();
        if let Some(first) = ids.next() {
            let root = self.create_node(first, None)?;
            self.arena.set_root(root);
            self.run_from(root, ids.collect())?;
        }
        Ok(self.finish())
    }

    /// Derives heights and hands the arena over.
    pub(super) fn finish(mut self) -> NodeArena<T> {
        self.arena.update_heights();
        self.arena
    }
}
