// src/core/indexing/mod.rs

pub mod balltree;
pub mod linear;

use crate::core::dataset::ElementId;
use std::fmt::Debug;

pub use balltree::{BallTreeError, Neighbor};
pub use linear::LinearScan;

/// Common contract of the similarity indexes in this crate.
///
/// An index is bound to a sealed data set, built once and then queried
/// through `&self`.
pub trait SpatialIndex<T>: Debug {
    /// Returns the name of the index.
    fn name(&self) -> &str;

    /// Builds or rebuilds the index over its bound data set.
    ///
    /// # Errors
    /// `NoDataSet` or `DataSetNotSealed` when the data set is missing or
    /// still open.
    fn build(&mut self) -> Result<(), BallTreeError>;

    /// Discards the current build.
    fn clear_build(&mut self);

    fn is_built(&self) -> bool;

    /// Number of indexed elements.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    fn size(&self) -> Result<usize, BallTreeError>;

    /// Elements strictly closer than `radius` to `center`, ascending by ID.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`, `InvalidQuery` for a negative or NaN radius.
    fn sphere_query(&self, center: &T, radius: f64) -> Result<Vec<ElementId>, BallTreeError>;

    /// The `k` nearest elements to `query`, closest first.
    ///
    /// # Errors
    /// `NotBuilt` before `build()`.
    fn knn_query(&self, query: &T, k: usize) -> Result<Vec<Neighbor>, BallTreeError>;
}
