pub mod common;
pub mod config;
pub mod dataset;
pub mod indexing;
pub mod metric;
pub use self::config::TreeConfig;
