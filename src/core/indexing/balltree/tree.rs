// src/core/indexing/balltree/tree.rs

//! Defines the core ball tree structures: `TreeNode` and the node arena.

use super::error::BallTreeError;
use crate::core::dataset::ElementId;
use serde::Serialize;
use std::fmt;

/// Handle of a node inside a built tree.
///
/// Handles are only meaningful for the build that produced them; `clear_build`
/// invalidates all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// One ball of the tree.
///
/// The node is organized around its `representative`. Elements at distance
/// zero from the representative are absorbed as `equivalents` instead of
/// spawning new nodes. Every element of the subtree lies within `radius` of
/// `center`.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub(super) representative: ElementId,
    pub(super) equivalents: Option<Vec<ElementId>>,
    pub(super) left: Option<NodeId>,
    pub(super) right: Option<NodeId>,
    pub(super) parent: Option<NodeId>,
    pub(super) center: T,
    pub(super) radius: f64,
    pub(super) size: usize,
    pub(super) height: usize,
    pub(super) depth: usize,
    pub(super) populated: bool,
}

impl<T> TreeNode<T> {
    /// A node holding only its representative, centered on it.
    pub(super) const fn new(
        representative: ElementId,
        center: T,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Self {
        Self {
            representative,
            equivalents: None,
            left: None,
            right: None,
            parent,
            center,
            radius: 0.0,
            size: 1,
            height: 0,
            depth,
            populated: false,
        }
    }

    #[must_use]
    pub const fn representative(&self) -> ElementId {
        self.representative
    }

    /// Elements at distance zero from the representative.
    #[must_use]
    pub fn equivalents(&self) -> &[ElementId] {
        self.equivalents.as_deref().unwrap_or(&[])
    }

    /// Representative followed by its equivalents.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::once(self.representative).chain(self.equivalents().iter().copied())
    }

    #[must_use]
    pub const fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[must_use]
    pub const fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Existing children, left first.
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        self.left.into_iter().chain(self.right)
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub const fn center(&self) -> &T {
        &self.center
    }

    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of elements in the subtree, including this node's own.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Whether the node has already absorbed its partition.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.populated
    }
}

/// Flat storage for a built tree: nodes addressed by `NodeId` plus the
/// element → owning node index.
///
/// Children always have larger ids than their parent.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<T> {
    nodes: Vec<TreeNode<T>>,
    root: Option<NodeId>,
    element_index: Vec<Option<NodeId>>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new(element_count: usize) -> Self {
        Self { nodes: Vec::new(), root: None, element_index: vec![None; element_count] }
    }

    pub(crate) const fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(super) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub(crate) fn node(&self, id: NodeId) -> &TreeNode<T> {
        &self.nodes[id.0]
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<T> {
        &mut self.nodes[id.0]
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn element_count(&self) -> usize {
        self.element_index.len()
    }

    /// All nodes in id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode<T>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub(super) fn push_node(&mut self, node: TreeNode<T>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Records that `element` lives in `node`.
    pub(super) fn register(&mut self, element: ElementId, node: NodeId) -> Result<(), BallTreeError> {
        match self.element_index.get_mut(element.index()) {
            None => Err(BallTreeError::ElementNotFound(element)),
            Some(Some(_)) => Err(BallTreeError::DuplicateElement(element)),
            Some(slot) => {
                *slot = Some(node);
                Ok(())
            }
        }
    }

    /// The node holding `element` as representative or equivalent.
    pub(crate) fn owner_of(&self, element: ElementId) -> Result<NodeId, BallTreeError> {
        self.element_index
            .get(element.index())
            .copied()
            .flatten()
            .ok_or(BallTreeError::ElementNotFound(element))
    }

    /// Derives every height bottom-up.
    pub(super) fn update_heights(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let height = self.nodes[i]
                .children()
                .map(|child| self.nodes[child.0].height + 1)
                .max()
                .unwrap_or(0);
            self.nodes[i].height = height;
        }
    }

    /// Appends every element of the subtree rooted at `id` to `out`.
    pub(crate) fn collect_subtree(&self, id: NodeId, out: &mut Vec<ElementId>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            out.extend(node.elements());
            stack.extend(node.children());
        }
    }

    /// Nodes at depth `level`, left to right.
    pub(crate) fn nodes_of_level(&self, level: usize) -> Vec<NodeId> {
        let mut frontier: Vec<NodeId> = self.root.into_iter().collect();
        for _ in 0..level {
            if frontier.is_empty() {
                break;
            }
            frontier = frontier.iter().flat_map(|&id| self.node(id).children()).collect();
        }
        frontier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(rep: usize, parent: Option<NodeId>, depth: usize) -> TreeNode<f64> {
        TreeNode::new(ElementId::new(rep), 0.0, parent, depth)
    }

    #[test]
    fn test_new_node_holds_only_representative() {
        let node = leaf(4, None, 0);
        assert_eq!(node.size(), 1);
        assert_eq!(node.height(), 0);
        assert!(node.is_leaf());
        assert!(!node.is_populated());
        assert!(node.equivalents().is_empty());
        assert_eq!(node.elements().collect::<Vec<_>>(), vec![ElementId::new(4)]);
    }

    #[test]
    fn test_register_rejects_duplicates_and_unknown_ids() {
        let mut arena: NodeArena<f64> = NodeArena::new(2);
        let root = arena.push_node(leaf(0, None, 0));
        assert!(arena.register(ElementId::new(0), root).is_ok());
        assert_eq!(
            arena.register(ElementId::new(0), root),
            Err(BallTreeError::DuplicateElement(ElementId::new(0)))
        );
        assert_eq!(
            arena.register(ElementId::new(9), root),
            Err(BallTreeError::ElementNotFound(ElementId::new(9)))
        );
        assert_eq!(arena.owner_of(ElementId::new(0)), Ok(root));
        assert!(arena.owner_of(ElementId::new(1)).is_err());
    }

    #[test]
    fn test_heights_and_levels() {
        let mut arena: NodeArena<f64> = NodeArena::new(4);
        let root = arena.push_node(leaf(0, None, 0));
        arena.set_root(root);
        let left = arena.push_node(leaf(1, Some(root), 1));
        let right = arena.push_node(leaf(2, Some(root), 1));
        let grandchild = arena.push_node(leaf(3, Some(left), 2));
        arena.node_mut(root).left = Some(left);
        arena.node_mut(root).right = Some(right);
        arena.node_mut(left).left = Some(grandchild);

        arena.update_heights();
        assert_eq!(arena.node(root).height(), 2);
        assert_eq!(arena.node(left).height(), 1);
        assert_eq!(arena.node(right).height(), 0);

        assert_eq!(arena.nodes_of_level(0), vec![root]);
        assert_eq!(arena.nodes_of_level(1), vec![left, right]);
        assert_eq!(arena.nodes_of_level(2), vec![grandchild]);
        assert!(arena.nodes_of_level(3).is_empty());

        let mut elements = Vec::new();
        arena.collect_subtree(left, &mut elements);
        elements.sort();
        assert_eq!(elements, vec![ElementId::new(1), ElementId::new(3)]);
    }
}
