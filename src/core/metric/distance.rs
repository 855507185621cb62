// src/core/metric/distance.rs

use super::Metric;
use crate::core::common::MetricTreeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Enumeration of supported coordinate metrics
/// Open for extension, closed for modification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Straight-line (L2) distance
    #[default]
    Euclidean,
    /// Sum of absolute differences (L1)
    Manhattan,
    /// Largest absolute difference (L∞)
    Chebyshev,
}

impl DistanceMetric {
    /// Get the name of the distance metric
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = MetricTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "manhattan" | "l1" => Ok(Self::Manhattan),
            "chebyshev" | "linf" => Ok(Self::Chebyshev),
            other => Err(MetricTreeError::InvalidInput {
                message: format!("unknown distance metric '{}'", other),
            }),
        }
    }
}

impl Metric<Vec<f64>> for DistanceMetric {
    fn distance(&self, a: &Vec<f64>, b: &Vec<f64>) -> f64 {
        let result = match self {
            Self::Euclidean => euclidean_distance_sq(a, b).map(f64::sqrt),
            Self::Manhattan => manhattan_distance(a, b),
            Self::Chebyshev => chebyshev_distance(a, b),
        };
        // Mismatched dimensions surface as NaN, which the tree rejects.
        result.unwrap_or(f64::NAN)
    }

    fn distance_sq(&self, a: &Vec<f64>, b: &Vec<f64>) -> f64 {
        match self {
            Self::Euclidean => euclidean_distance_sq(a, b).unwrap_or(f64::NAN),
            Self::Manhattan | Self::Chebyshev => {
                let d = self.distance(a, b);
                d * d
            }
        }
    }

    fn name(&self) -> &'static str {
        self.as_str()
    }
}

fn check_dimensions(v1: &[f64], v2: &[f64]) -> Result<(), MetricTreeError> {
    if v1.len() == v2.len() {
        Ok(())
    } else {
        Err(MetricTreeError::InvalidInput {
            message: format!("vector dimension mismatch: {} vs {}", v1.len(), v2.len()),
        })
    }
}

/// Calculates the squared Euclidean distance between two vectors.
///
/// # Errors
///
/// Returns `MetricTreeError::InvalidInput` if the vectors have different dimensions.
pub fn euclidean_distance_sq(v1: &[f64], v2: &[f64]) -> Result<f64, MetricTreeError> {
    check_dimensions(v1, v2)?;
    Ok(v1.iter().zip(v2.iter()).map(|(a, b)| (a - b).powi(2)).sum())
}

/// Calculates the Manhattan (L1) distance between two vectors.
///
/// # Errors
///
/// Returns `MetricTreeError::InvalidInput` if the vectors have different dimensions.
pub fn manhattan_distance(v1: &[f64], v2: &[f64]) -> Result<f64, MetricTreeError> {
    check_dimensions(v1, v2)?;
    Ok(v1.iter().zip(v2.iter()).map(|(a, b)| (a - b).abs()).sum())
}

/// Calculates the Chebyshev (L∞) distance between two vectors.
///
/// # Errors
///
/// Returns `MetricTreeError::InvalidInput` if the vectors have different dimensions.
pub fn chebyshev_distance(v1: &[f64], v2: &[f64]) -> Result<f64, MetricTreeError> {
    check_dimensions(v1, v2)?;
    Ok(v1.iter().zip(v2.iter()).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq; // For floating point comparisons

    #[test]
    fn test_euclidean_distance_sq_success() {
        let v1 = [1.0, 2.0, 3.0];
        let v2 = [4.0, 6.0, 3.0];
        assert_relative_eq!(euclidean_distance_sq(&v1, &v2).unwrap(), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_euclidean_distance_empty_vectors() {
        let v1: [f64; 0] = [];
        let v2: [f64; 0] = [];
        assert_relative_eq!(euclidean_distance_sq(&v1, &v2).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_manhattan_and_chebyshev() {
        let v1 = [1.0, -2.0];
        let v2 = [4.0, 2.0];
        assert_relative_eq!(manhattan_distance(&v1, &v2).unwrap(), 7.0, epsilon = 1e-12);
        assert_relative_eq!(chebyshev_distance(&v1, &v2).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let v1 = [1.0, 2.0];
        let v2 = [4.0, 5.0, 6.0];
        match manhattan_distance(&v1, &v2) {
            Err(MetricTreeError::InvalidInput { message }) => {
                assert!(message.contains("2 vs 3"));
            }
            _ => panic!("Expected InvalidInput"),
        }
    }

    #[test]
    fn test_metric_enum_distances() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert_relative_eq!(DistanceMetric::Euclidean.distance(&a, &b), 5.0, epsilon = 1e-12);
        assert_relative_eq!(DistanceMetric::Euclidean.distance_sq(&a, &b), 25.0, epsilon = 1e-12);
        assert_relative_eq!(DistanceMetric::Manhattan.distance(&a, &b), 7.0, epsilon = 1e-12);
        assert_relative_eq!(DistanceMetric::Manhattan.distance_sq(&a, &b), 49.0, epsilon = 1e-12);
        assert_relative_eq!(DistanceMetric::Chebyshev.distance(&a, &b), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_metric_enum_mismatch_is_nan() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0];
        assert!(DistanceMetric::Euclidean.distance(&a, &b).is_nan());
        assert!(DistanceMetric::Chebyshev.distance_sq(&a, &b).is_nan());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Euclidean".parse::<DistanceMetric>().unwrap(), DistanceMetric::Euclidean);
        assert_eq!("l1".parse::<DistanceMetric>().unwrap(), DistanceMetric::Manhattan);
        assert_eq!("linf".parse::<DistanceMetric>().unwrap(), DistanceMetric::Chebyshev);
        assert!("cosine".parse::<DistanceMetric>().is_err());
        assert_eq!(DistanceMetric::default().name(), "euclidean");
    }
}
