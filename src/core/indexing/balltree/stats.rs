// src/core/indexing/balltree/stats.rs

//! Structural introspection of a built tree and per-query counters.

use serde::Serialize;

use super::center::Centering;
use super::error::BallTreeError;
use super::tree::{NodeArena, NodeId, TreeNode};
use super::MetricTree;
use crate::core::dataset::ElementId;
use crate::core::metric::Metric;

/// Work done by a single query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    pub distance_computations: usize,
    pub nodes_visited: usize,
    pub nodes_pruned: usize,
    /// Nodes whose whole subtree was reported without per-element checks.
    pub subtrees_reported: usize,
}

/// Summary of a built tree's shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeStatistics {
    pub name: String,
    pub metric: &'static str,
    pub centering: &'static str,
    pub size: usize,
    pub height: Option<usize>,
    pub node_count: usize,
    pub inner_nodes: usize,
    pub leaf_nodes: usize,
    pub leaf_depth_distribution: Vec<usize>,
    pub mean_leaf_depth: f64,
    pub mean_leaf_radius: f64,
    pub equivalents: usize,
}

impl<T, M, C> MetricTree<T, M, C>
where
    M: Metric<T>,
    C: Centering<T>,
{
    fn built(&self) -> Result<&NodeArena<T>, BallTreeError> {
        self.arena.as_ref().ok_or(BallTreeError::NotBuilt)
    }

    /// Number of indexed elements.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn size(&self) -> Result<usize, BallTreeError> {
        let arena = self.built()?;
        Ok(arena.root().map_or(0, |root| arena.node(root).size()))
    }

    /// Height of the root, `None` for an empty tree.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn height(&self) -> Result<Option<usize>, BallTreeError> {
        let arena = self.built()?;
        Ok(arena.root().map(|root| arena.node(root).height()))
    }

    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn number_of_inner_nodes(&self) -> Result<usize, BallTreeError> {
        Ok(self.built()?.iter().filter(|(_, node)| !node.is_leaf()).count())
    }

    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn number_of_leaf_nodes(&self) -> Result<usize, BallTreeError> {
        Ok(self.built()?.iter().filter(|(_, node)| node.is_leaf()).count())
    }

    /// Leaf count per depth, indexed `0..=height`. Empty for an empty tree.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn leaf_depth_distribution(&self) -> Result<Vec<usize>, BallTreeError> {
        let arena = self.built()?;
        let Some(height) = self.height()? else {
            return Ok(Vec::new());
        };
        let mut distribution = vec![0; height + 1];
        for (_, node) in arena.iter().filter(|(_, node)| node.is_leaf()) {
            distribution[node.depth()] += 1;
        }
        Ok(distribution)
    }

    /// Node handles at depth `level`, left to right.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn nodes_of_level(&self, level: usize) -> Result<Vec<NodeId>, BallTreeError> {
        Ok(self.built()?.nodes_of_level(level))
    }

    /// For each node at depth `level`, every element of its subtree.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn subtree_elements_of_level(&self, level: usize) -> Result<Vec<Vec<ElementId>>, BallTreeError> {
        let arena = self.built()?;
        Ok(arena
            .nodes_of_level(level)
            .into_iter()
            .map(|id| {
                let mut elements = Vec::with_capacity(arena.node(id).size());
                arena.collect_subtree(id, &mut elements);
                elements.sort_unstable();
                elements
            })
            .collect())
    }

    /// Size of the subtree whose root holds `element`.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`, `ElementNotFound` for an unknown ID.
    pub fn subtree_size_of(&self, element: ElementId) -> Result<usize, BallTreeError> {
        let arena = self.built()?;
        Ok(arena.node(arena.owner_of(element)?).size())
    }

    /// Handle of the node holding `element` as representative or equivalent.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`, `ElementNotFound` for an unknown ID.
    pub fn node_of_element(&self, element: ElementId) -> Result<NodeId, BallTreeError> {
        self.built()?.owner_of(element)
    }

    /// # Errors
    /// `NotBuilt` before `build()`, `InvalidQuery` for a handle from another build.
    pub fn node(&self, id: NodeId) -> Result<&TreeNode<T>, BallTreeError> {
        self.built()?
            .get(id)
            .ok_or_else(|| BallTreeError::InvalidQuery(format!("unknown node handle {}", id)))
    }

    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn root(&self) -> Result<Option<NodeId>, BallTreeError> {
        Ok(self.built()?.root())
    }

    /// # Errors
    /// `NotBuilt` before `build()`.
    #[allow(clippy::cast_precision_loss)]
    pub fn statistics(&self) -> Result<TreeStatistics, BallTreeError> {
        let arena = self.built()?;
        let leaves: Vec<&TreeNode<T>> =
            arena.iter().filter(|(_, node)| node.is_leaf()).map(|(_, node)| node).collect();
        let (mean_leaf_depth, mean_leaf_radius) = if leaves.is_empty() {
            (0.0, 0.0)
        } else {
            let n = leaves.len() as f64;
            (
                leaves.iter().map(|node| node.depth() as f64).sum::<f64>() / n,
                leaves.iter().map(|node| node.radius()).sum::<f64>() / n,
            )
        };

        Ok(TreeStatistics {
            name: self.config.name.clone(),
            metric: self.metric.name(),
            centering: C::NAME,
            size: self.size()?,
            height: self.height()?,
            node_count: arena.node_count(),
            inner_nodes: arena.node_count() - leaves.len(),
            leaf_nodes: leaves.len(),
            leaf_depth_distribution: self.leaf_depth_distribution()?,
            mean_leaf_depth,
            mean_leaf_radius,
            equivalents: arena.iter().map(|(_, node)| node.equivalents().len()).sum(),
        })
    }
}
