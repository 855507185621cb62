// src/core/indexing/balltree/mod.rs

//! Ball tree (metric tree) index over an arbitrary metric space.
//!
//! The tree is built once from a sealed [`DataSet`] and is immutable
//! afterwards. Any change to the data means binding a new data set and
//! building again.

// Re-export key components for easier use.
pub use self::candidates::Neighbor;
pub use self::center::{Centering, MeanCenter, RepresentativeCenter};
pub use self::error::BallTreeError;
pub(crate) use self::error::checked_distance;
pub use self::stats::{QueryStats, TreeStatistics};
pub use self::tree::{NodeId, TreeNode};

use self::builder::TreeBuilder;
use self::tree::NodeArena;
use super::SpatialIndex;
use crate::core::config::TreeConfig;
use crate::core::dataset::{DataSet, ElementId};
use crate::core::metric::Metric;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

mod builder;
mod candidates;
mod center;
mod error;
mod search;
mod stats;
mod tree;
mod verify;

#[cfg(test)]
mod tests;

/// Metric tree whose node centers are the mean of their subtree.
pub type CenteredBallTree<T, M> = MetricTree<T, M, MeanCenter>;

/// Metric tree whose node centers are their representatives. Needs nothing
/// from the payload beyond the metric.
pub type BallTree<T, M> = MetricTree<T, M, RepresentativeCenter>;

/// `MetricTree`: a binary ball tree over the elements of a bound data set.
///
/// `C` picks how node centers are derived; see [`CenteredBallTree`] and
/// [`BallTree`].
#[derive(Debug)]
pub struct MetricTree<T, M, C = MeanCenter> {
    metric: M,
    config: TreeConfig,
    data: Option<Arc<DataSet<T>>>,
    arena: Option<NodeArena<T>>,
    _centering: PhantomData<C>,
}

impl<T, M, C> MetricTree<T, M, C> {
    /// Creates an unbound tree with the default configuration.
    pub fn new(metric: M) -> Self {
        Self::with_config(metric, TreeConfig::default())
    }

    pub fn with_config(metric: M, config: TreeConfig) -> Self {
        Self { metric, config, data: None, arena: None, _centering: PhantomData }
    }

    /// Creates a tree bound to `data`. The tree still has to be built.
    pub fn with_data_set(metric: M, data: Arc<DataSet<T>>) -> Self {
        let mut tree = Self::new(metric);
        tree.data = Some(data);
        tree
    }

    /// Binds a new data set, discarding any existing build.
    pub fn set_data_set(&mut self, data: Arc<DataSet<T>>) {
        self.clear_build();
        self.data = Some(data);
    }

    #[must_use]
    pub fn data_set(&self) -> Option<&Arc<DataSet<T>>> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn metric(&self) -> &M {
        &self.metric
    }

    #[must_use]
    pub const fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Drops all nodes and the element index.
    pub fn clear_build(&mut self) {
        if self.arena.take().is_some() {
            debug!(name = %self.config.name, "cleared metric tree build");
        }
    }

    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.arena.is_some()
    }

    fn built_parts(&self) -> Result<(&NodeArena<T>, &DataSet<T>), BallTreeError> {
        let arena = self.arena.as_ref().ok_or(BallTreeError::NotBuilt)?;
        let data = self.data.as_deref().ok_or(BallTreeError::NoDataSet)?;
        Ok((arena, data))
    }
}

impl<T, M, C> MetricTree<T, M, C>
where
    M: Metric<T>,
    C: Centering<T>,
{
    /// Indexes every element of the bound data set.
    ///
    /// An existing build is discarded first. An empty data set yields a built
    /// tree without a root.
    ///
    /// # Errors
    /// `NoDataSet` when unbound, `DataSetNotSealed` when the data set is still
    /// open, `InvalidDistance` when the metric misbehaves, and
    /// `InvariantViolation` when `verify_after_build` is set and a check fails.
    pub fn build(&mut self) -> Result<(), BallTreeError> {
        let data = Arc::clone(self.data.as_ref().ok_or(BallTreeError::NoDataSet)?);
        if !data.is_sealed() {
            return Err(BallTreeError::DataSetNotSealed);
        }
        self.clear_build();

        debug!(
            name = %self.config.name,
            metric = self.metric.name(),
            centering = C::NAME,
            elements = data.len(),
            "building metric tree"
        );
        let arena = TreeBuilder::<T, M, C>::new(&data, &self.metric).run()?;
        let nodes = arena.node_count();
        let height = arena.root().map(|root| arena.node(root).height());
        self.arena = Some(arena);

        if self.config.verify_after_build {
            if let Err(e) = self.verify() {
                warn!(name = %self.config.name, error = %e, "metric tree failed verification");
                self.clear_build();
                return Err(e);
            }
        }

        info!(name = %self.config.name, elements = data.len(), nodes, height = ?height, "metric tree built");
        Ok(())
    }

    /// Elements strictly closer than `radius` to `center`, ascending by ID.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`, `InvalidQuery` for a negative or NaN radius.
    pub fn sphere_query(&self, center: &T, radius: f64) -> Result<Vec<ElementId>, BallTreeError> {
        self.sphere_query_with_stats(center, radius).map(|(found, _)| found)
    }

    /// Same as [`MetricTree::sphere_query`], plus the work it took.
    ///
    /// # Errors
    /// Same as [`MetricTree::sphere_query`].
    pub fn sphere_query_with_stats(
        &self,
        center: &T,
        radius: f64,
    ) -> Result<(Vec<ElementId>, QueryStats), BallTreeError> {
        let (arena, data) = self.built_parts()?;
        let (found, stats) = search::sphere_query(arena, data, &self.metric, center, radius)?;
        trace!(radius, results = found.len(), ?stats, "sphere query");
        Ok((found, stats))
    }

    /// The `k` nearest elements to `query`, closest first.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    pub fn knn_query(&self, query: &T, k: usize) -> Result<Vec<Neighbor>, BallTreeError> {
        self.knn_query_with_stats(query, k).map(|(neighbors, _)| neighbors)
    }

    /// Same as [`MetricTree::knn_query`], plus the work it took.
    ///
    /// # Errors
    /// Same as [`MetricTree::knn_query`].
    pub fn knn_query_with_stats(&self, query: &T, k: usize) -> Result<(Vec<Neighbor>, QueryStats), BallTreeError> {
        let (arena, data) = self.built_parts()?;
        let (neighbors, stats) = search::knn_query(arena, data, &self.metric, query, k)?;
        trace!(k, results = neighbors.len(), ?stats, "knn query");
        Ok((neighbors, stats))
    }
}

impl<T, M, C> SpatialIndex<T> for MetricTree<T, M, C>
where
    T: Debug,
    M: Metric<T> + Debug,
    C: Centering<T> + Debug,
{
    fn name(&self) -> &str {
        &self.config.name
    }

    fn build(&mut self) -> Result<(), BallTreeError> {
        Self::build(self)
    }

    fn clear_build(&mut self) {
        Self::clear_build(self);
    }

    fn is_built(&self) -> bool {
        Self::is_built(self)
    }

    fn size(&self) -> Result<usize, BallTreeError> {
        Self::size(self)
    }

    fn sphere_query(&self, center: &T, radius: f64) -> Result<Vec<ElementId>, BallTreeError> {
        Self::sphere_query(self, center, radius)
    }

    fn knn_query(&self, query: &T, k: usize) -> Result<Vec<Neighbor>, BallTreeError> {
        Self::knn_query(self, query, k)
    }
}
