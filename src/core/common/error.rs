use crate::core::dataset::ElementId;
use crate::core::indexing::balltree::BallTreeError;
use std::fmt;

#[derive(Debug)]
pub enum MetricTreeError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Configuration(String),
    DataSetSealed,
    ElementNotFound(ElementId),
    InvalidInput { message: String },
    Index(BallTreeError),
}

impl fmt::Display for MetricTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {}", e),
            Self::Json(e) => write!(f, "JSON Serialization/Deserialization Error: {}", e),
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::DataSetSealed => write!(f, "Data set is sealed and can no longer be modified"),
            Self::ElementNotFound(id) => write!(f, "Element not found: {}", id),
            Self::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            Self::Index(e) => write!(f, "Index Error: {}", e),
        }
    }
}

impl std::error::Error for MetricTreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Index(e) => Some(e),
            _ => None,
        }
    }
}

// Manual From implementations
impl From<std::io::Error> for MetricTreeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for MetricTreeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<BallTreeError> for MetricTreeError {
    fn from(err: BallTreeError) -> Self {
        Self::Index(err)
    }
}
