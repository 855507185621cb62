#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_possible_wrap)]
#![warn(clippy::cast_sign_loss)]
#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::all)]

//! # metrictree: build-once ball trees over arbitrary metric spaces
//!
//! `metrictree` indexes opaque elements for range ("sphere") and
//! k-nearest-neighbor queries. The only thing it needs from the data is a
//! distance function satisfying the metric axioms.
//!
//! - Elements live in a [`DataSet`] that must be sealed before indexing
//! - A [`MetricTree`] is built once over a sealed data set and is then immutable
//! - The centered variant ([`CenteredBallTree`]) uses the subtree mean as ball
//!   center; the uncentered variant ([`BallTree`]) uses the representative and
//!   works for any metric, e.g. edit distance over strings
//! - Queries prune whole subtrees with the triangle inequality
//!
//! ```
//! use metrictree::{CenteredBallTree, DataSet, DistanceMetric};
//! use std::sync::Arc;
//!
//! let data = DataSet::from_payloads(vec![
//!     vec![0.0, 0.0],
//!     vec![10.0, 0.0],
//!     vec![5.0, 5.0],
//! ]);
//! let mut tree = CenteredBallTree::with_data_set(DistanceMetric::Euclidean, Arc::new(data));
//! tree.build().unwrap();
//!
//! let nearest = tree.knn_query(&vec![1.0, 1.0], 1).unwrap();
//! assert_eq!(nearest[0].id.index(), 0);
//! ```

pub mod core;

pub use crate::core::common::{MetricTreeError, Result};
pub use crate::core::config::{TreeConfig, TreeConfigBuilder};
pub use crate::core::dataset::{DataSet, ElementId};
pub use crate::core::indexing::balltree::{
    BallTree, BallTreeError, CenteredBallTree, Centering, MeanCenter, MetricTree, Neighbor, NodeId,
    QueryStats, RepresentativeCenter, TreeNode, TreeStatistics,
};
pub use crate::core::indexing::{LinearScan, SpatialIndex};
pub use crate::core::metric::{Centroid, DistanceMetric, Levenshtein, Metric};
