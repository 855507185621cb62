// src/core/indexing/balltree/verify.rs

//! Post-build invariant checks.

use super::center::Centering;
use super::error::{checked_distance, BallTreeError};
use super::MetricTree;
use crate::core::metric::Metric;

fn violation(message: String) -> BallTreeError {
    BallTreeError::InvariantViolation(message)
}

impl<T, M, C> MetricTree<T, M, C>
where
    M: Metric<T>,
    C: Centering<T>,
{
    /// Checks every structural invariant of the built tree.
    ///
    /// Covered: subtree sizes, heights, depths and parent links, radius
    /// containment and tightness within `radius_tolerance`, and the element
    /// index covering each element exactly once.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`, `InvariantViolation` naming the first
    /// breach found.
    pub fn verify(&self) -> Result<(), BallTreeError> {
        let arena = self.arena.as_ref().ok_or(BallTreeError::NotBuilt)?;
        let data = self.data.as_ref().ok_or(BallTreeError::NoDataSet)?;
        let tolerance = self.config.radius_tolerance;

        if arena.element_count() != data.len() {
            return Err(violation(format!(
                "index covers {} elements but the data set holds {}",
                arena.element_count(),
                data.len()
            )));
        }

        let mut seen = vec![false; data.len()];
        for (id, node) in arena.iter() {
            for element in node.elements() {
                let slot = seen
                    .get_mut(element.index())
                    .ok_or_else(|| violation(format!("{} holds unknown element {}", id, element)))?;
                if *slot {
                    return Err(violation(format!("element {} appears twice", element)));
                }
                *slot = true;
                if arena.owner_of(element)? != id {
                    return Err(violation(format!("index maps {} away from {}", element, id)));
                }
            }

            let children_size: usize = node.children().map(|c| arena.node(c).size()).sum();
            let expected_size = 1 + node.equivalents().len() + children_size;
            if node.size() != expected_size {
                return Err(violation(format!(
                    "{} has size {} but its parts add up to {}",
                    id,
                    node.size(),
                    expected_size
                )));
            }

            let expected_height = node.children().map(|c| arena.node(c).height() + 1).max().unwrap_or(0);
            if node.height() != expected_height {
                return Err(violation(format!(
                    "{} has height {} instead of {}",
                    id,
                    node.height(),
                    expected_height
                )));
            }

            let expected_depth = match node.parent() {
                Some(parent) => arena.node(parent).depth() + 1,
                None if arena.root() == Some(id) => 0,
                None => return Err(violation(format!("{} has no parent but is not the root", id))),
            };
            if node.depth() != expected_depth {
                return Err(violation(format!(
                    "{} has depth {} instead of {}",
                    id,
                    node.depth(),
                    expected_depth
                )));
            }
            if let Some(child) = node.children().find(|&c| arena.node(c).parent() != Some(id)) {
                return Err(violation(format!("{} does not point back to its parent {}", child, id)));
            }

            let mut subtree = Vec::with_capacity(node.size());
            arena.collect_subtree(id, &mut subtree);
            let mut farthest: f64 = 0.0;
            for element in subtree {
                let payload = data.get(element).ok_or(BallTreeError::ElementNotFound(element))?;
                let d = checked_distance(self.metric.distance(node.center(), payload), "verify")?;
                if d > node.radius() + tolerance {
                    return Err(violation(format!(
                        "element {} lies at {} outside the radius {} of {}",
                        element,
                        d,
                        node.radius(),
                        id
                    )));
                }
                farthest = farthest.max(d);
            }
            if farthest < node.radius() - tolerance {
                return Err(violation(format!(
                    "radius {} of {} is not tight; farthest element is at {}",
                    node.radius(),
                    id,
                    farthest
                )));
            }
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(violation(format!("element #{} is not in the tree", missing)));
        }
        Ok(())
    }
}
