pub mod error;
pub use error::MetricTreeError;

/// Core result type for the library
pub type Result<T> = std::result::Result<T, MetricTreeError>;

#[cfg(test)]
mod tests {
    mod error_tests;
}
