// src/core/indexing/balltree/tests/mod.rs


use crate::core::config::TreeConfig;
use crate::core::dataset::DataSet;
use crate::core::indexing::balltree::CenteredBallTree;
use crate::core::metric::DistanceMetric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub(super) fn sealed(points: Vec<Vec<f64>>) -> Arc<DataSet<Vec<f64>>> {
    Arc::new(DataSet::from_payloads(points))
}

/// A built, verified centered tree over `points`.
pub(super) fn built_tree(points: Vec<Vec<f64>>) -> CenteredBallTree<Vec<f64>, DistanceMetric> {
    let mut tree = CenteredBallTree::with_config(DistanceMetric::Euclidean, TreeConfig::for_testing().unwrap());
    tree.set_data_set(sealed(points));
    tree.build().unwrap();
    tree
}

pub(super) fn random_points(seed: u64, count: usize, dimension: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..dimension).map(|_| rng.gen_range(-50.0..50.0)).collect())
        .collect()
}

/// Points on a small integer grid, so many of them coincide.
pub(super) fn grid_points(seed: u64, count: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| vec![f64::from(rng.gen_range(0..6_i32)), f64::from(rng.gen_range(0..6_i32))])
        .collect()
}

/// {(0,0), (0,0), (10,0), (10,1), (5,5)}
pub(super) fn five_points() -> Vec<Vec<f64>> {
    vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 1.0], vec![5.0, 5.0]]
}
