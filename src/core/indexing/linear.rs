// src/core/indexing/linear.rs

//! Brute-force reference index.
//!
//! `LinearScan` answers every query by measuring each element. It is the
//! baseline the tree is checked and benchmarked against.

use super::balltree::{checked_distance, BallTreeError, Neighbor};
use super::SpatialIndex;
use crate::core::dataset::{DataSet, ElementId};
use crate::core::metric::Metric;
use std::fmt::Debug;
use std::sync::Arc;

#[derive(Debug)]
pub struct LinearScan<T, M> {
    name: String,
    metric: M,
    data: Arc<DataSet<T>>,
    built: bool,
}

impl<T, M: Metric<T>> LinearScan<T, M> {
    pub fn new(metric: M, data: Arc<DataSet<T>>) -> Self {
        Self { name: "linear_scan".to_string(), metric, data, built: false }
    }

    fn data(&self) -> Result<&DataSet<T>, BallTreeError> {
        if !self.built {
            return Err(BallTreeError::NotBuilt);
        }
        Ok(&self.data)
    }

    /// Distance from `query` to every element, in ID order.
    fn distances<'a>(
        &'a self,
        query: &'a T,
        context: &'static str,
    ) -> Result<impl Iterator<Item = Result<(ElementId, f64), BallTreeError>> + 'a, BallTreeError> {
        let data = self.data()?;
        Ok(data
            .iter()
            .map(move |(id, payload)| {
                checked_distance(self.metric.distance(payload, query), context).map(|d| (id, d))
            }))
    }
}

impl<T, M> SpatialIndex<T> for LinearScan<T, M>
where
    T: Debug,
    M: Metric<T> + Debug,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&mut self) -> Result<(), BallTreeError> {
        if !self.data.is_sealed() {
            return Err(BallTreeError::DataSetNotSealed);
        }
        self.built = true;
        Ok(())
    }

    fn clear_build(&mut self) {
        self.built = false;
    }

    fn is_built(&self) -> bool {
        self.built
    }

    fn size(&self) -> Result<usize, BallTreeError> {
        Ok(self.data()?.len())
    }

    fn sphere_query(&self, center: &T, radius: f64) -> Result<Vec<ElementId>, BallTreeError> {
        if radius.is_nan() || radius < 0.0 {
            return Err(BallTreeError::InvalidQuery(format!(
                "sphere radius must be a non-negative number, got {}",
                radius
            )));
        }
        let mut found = Vec::new();
        for entry in self.distances(center, "linear sphere")? {
            let (id, d) = entry?;
            if d < radius {
                found.push(id);
            }
        }
        Ok(found)
    }

    fn knn_query(&self, query: &T, k: usize) -> Result<Vec<Neighbor>, BallTreeError> {
        let mut all: Vec<Neighbor> = self
            .distances(query, "linear knn")?
            .map(|entry| entry.map(|(id, distance)| Neighbor { id, distance }))
            .collect::<Result<_, _>>()?;
        all.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        all.truncate(k);
        Ok(all)
    }
}
