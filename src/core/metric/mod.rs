// src/core/metric/mod.rs

//! Distance functions and the payload algebra the tree needs.
//!
//! The tree only ever calls [`Metric::distance`] and [`Metric::distance_sq`].
//! The centered tree variant additionally needs to average payloads, which is
//! what [`Centroid`] provides.

pub mod distance;
pub mod edit;

pub use distance::{chebyshev_distance, euclidean_distance_sq, manhattan_distance, DistanceMetric};
pub use edit::Levenshtein;

/// A distance function over elements of type `T`.
///
/// Implementations must be pure and satisfy the metric axioms:
/// - Non-negative: `d(x, y) >= 0`
/// - Identity: `d(x, x) == 0`
/// - Symmetric: `d(x, y) == d(y, x)`
/// - Triangle inequality: `d(x, z) <= d(x, y) + d(y, z)`
///
/// Tree pruning is exact only when these hold. A negative or NaN result is a
/// contract violation and is rejected by the tree rather than propagated.
pub trait Metric<T: ?Sized> {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &T, b: &T) -> f64;

    /// Squared distance. Override when it is cheaper than `distance`.
    fn distance_sq(&self, a: &T, b: &T) -> f64 {
        let d = self.distance(a, b);
        d * d
    }

    /// Short identifier used in logs and statistics.
    fn name(&self) -> &'static str;
}

impl<T: ?Sized, M: Metric<T> + ?Sized> Metric<T> for &M {
    fn distance(&self, a: &T, b: &T) -> f64 {
        (**self).distance(a, b)
    }

    fn distance_sq(&self, a: &T, b: &T) -> f64 {
        (**self).distance_sq(a, b)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Payloads that can be averaged into a synthetic center point.
pub trait Centroid: Clone {
    /// A zero point with the same shape as `self`.
    #[must_use]
    fn zero_like(&self) -> Self;

    /// Adds `other` into `self` component-wise.
    fn accumulate(&mut self, other: &Self);

    /// Multiplies every component by `factor`.
    fn scale(&mut self, factor: f64);
}

impl Centroid for Vec<f64> {
    fn zero_like(&self) -> Self {
        vec![0.0; self.len()]
    }

    fn accumulate(&mut self, other: &Self) {
        // A length mismatch leaves a NaN behind so the distance guard trips.
        if self.len() != other.len() {
            self.iter_mut().for_each(|x| *x = f64::NAN);
            return;
        }
        for (acc, value) in self.iter_mut().zip(other.iter()) {
            *acc += value;
        }
    }

    fn scale(&mut self, factor: f64) {
        for value in self.iter_mut() {
            *value *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centroid_mean_of_vectors() {
        let a = vec![1.0, 2.0];
        let b = vec![3.0, 6.0];
        let mut sum = a.zero_like();
        sum.accumulate(&a);
        sum.accumulate(&b);
        sum.scale(0.5);
        assert_relative_eq!(sum[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(sum[1], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid_length_mismatch_poisons_sum() {
        let mut sum = vec![0.0, 0.0];
        sum.accumulate(&vec![1.0]);
        assert!(sum.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_metric_by_reference() {
        let metric = DistanceMetric::Euclidean;
        let by_ref = &metric;
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert_relative_eq!(by_ref.distance(&a, &b), 5.0, epsilon = 1e-12);
        assert_relative_eq!(by_ref.distance_sq(&a, &b), 25.0, epsilon = 1e-12);
        assert_eq!(by_ref.name(), "euclidean");
    }
}
