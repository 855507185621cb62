// src/core/indexing/balltree/error.rs

use super::tree::NodeId;
use crate::core::dataset::ElementId;
use std::fmt;

/// Custom error types for ball tree operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BallTreeError {
    /// A query or introspection call was made before `build()`.
    NotBuilt,
    /// `build()` was called without a bound data set.
    NoDataSet,
    /// `build()` was called on a data set that is still open for writes.
    DataSetNotSealed,
    /// The same element identity reached the tree twice.
    DuplicateElement(ElementId),
    /// A node that already holds its subtree was asked to absorb more elements.
    NodeAlreadyPopulated(NodeId),
    /// The element is not part of the indexed data set.
    ElementNotFound(ElementId),
    /// The metric returned a negative or NaN distance.
    InvalidDistance { value: f64, context: &'static str },
    /// Query parameters are out of range.
    InvalidQuery(String),
    /// A structural invariant does not hold after build.
    InvariantViolation(String),
}

impl fmt::Display for BallTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBuilt => write!(f, "Ball tree has not been built"),
            Self::NoDataSet => write!(f, "No data set is bound to the ball tree"),
            Self::DataSetNotSealed => write!(f, "Data set must be sealed before building"),
            Self::DuplicateElement(id) => write!(f, "Duplicate element {} in ball tree", id),
            Self::NodeAlreadyPopulated(node) => write!(
                f,
                "Node {} is already populated; dynamic insertion after build is unsupported",
                node
            ),
            Self::ElementNotFound(id) => write!(f, "Element {} not found in ball tree", id),
            Self::InvalidDistance { value, context } => {
                write!(f, "Metric returned invalid distance {} ({})", value, context)
            }
            Self::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            Self::InvariantViolation(msg) => write!(f, "Ball tree invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for BallTreeError {}

/// Rejects negative and NaN distances before they reach radii or bounds.
pub(crate) fn checked_distance(value: f64, context: &'static str) -> Result<f64, BallTreeError> {
    if value.is_nan() || value < 0.0 {
        Err(BallTreeError::InvalidDistance { value, context })
    } else {
        Ok(value)
    }
}
