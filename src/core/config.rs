// src/core/config.rs

use crate::core::common::MetricTreeError;
use serde::{Deserialize, Serialize};
use std::fs; // For reading file
use std::path::Path;

/// Configuration for a metric tree.
///
/// Every field has a default, so a TOML file only needs to name the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
    /// Name reported by the index.
    pub name: String,
    /// Run `verify()` at the end of every build.
    pub verify_after_build: bool,
    /// Absolute slack allowed when checking radius containment and tightness.
    pub radius_tolerance: f64,
    /// Neighbor count used when a caller does not supply one.
    pub default_k: usize,
}

/// Builder for `TreeConfig`.
#[derive(Debug, Clone, Default)]
pub struct TreeConfigBuilder {
    name: Option<String>,
    verify_after_build: Option<bool>,
    radius_tolerance: Option<f64>,
    default_k: Option<usize>,
}

impl TreeConfigBuilder {
    /// Creates a new builder with every option unset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the index name
    #[must_use]
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Enables or disables the post-build invariant check
    #[must_use]
    pub fn verify_after_build(mut self, enabled: bool) -> Self {
        self.verify_after_build = Some(enabled);
        self
    }

    /// Sets the radius tolerance used by `verify()`
    #[must_use]
    pub fn radius_tolerance(mut self, tolerance: f64) -> Self {
        self.radius_tolerance = Some(tolerance);
        self
    }

    /// Sets the default neighbor count
    #[must_use]
    pub fn default_k(mut self, k: usize) -> Self {
        self.default_k = Some(k);
        self
    }

    /// Builds the config with validation
    ///
    /// # Errors
    /// Returns `MetricTreeError::Configuration` if a value is out of range.
    pub fn build(self) -> Result<TreeConfig, MetricTreeError> {
        let defaults = TreeConfig::default();
        let config = TreeConfig {
            name: self.name.unwrap_or(defaults.name),
            verify_after_build: self.verify_after_build.unwrap_or(defaults.verify_after_build),
            radius_tolerance: self.radius_tolerance.unwrap_or(defaults.radius_tolerance),
            default_k: self.default_k.unwrap_or(defaults.default_k),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            name: "metric_tree".to_string(),
            verify_after_build: false,
            radius_tolerance: 1e-9,
            default_k: 10,
        }
    }
}

impl TreeConfig {
    /// Creates a new `TreeConfigBuilder` for fluent configuration
    #[must_use]
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::new()
    }

    /// Validates the configuration
    ///
    /// # Errors
    /// Returns `MetricTreeError::Configuration` describing the first invalid value.
    pub fn validate(&self) -> Result<(), MetricTreeError> {
        if self.name.trim().is_empty() {
            return Err(MetricTreeError::Configuration("name must not be empty".to_string()));
        }

        if !self.radius_tolerance.is_finite() || self.radius_tolerance < 0.0 {
            return Err(MetricTreeError::Configuration(
                "radius_tolerance must be a finite, non-negative number".to_string(),
            ));
        }

        if self.default_k == 0 {
            return Err(MetricTreeError::Configuration(
                "default_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `MetricTreeError::Configuration` if parsing or validation fails,
    /// and `MetricTreeError::Io` for any other read failure.
    pub fn load_from_file(path: &Path) -> Result<Self, MetricTreeError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    MetricTreeError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;

                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(MetricTreeError::Io(e)),
        }
    }

    /// Loads configuration from an optional TOML file path.
    ///
    /// # Errors
    ///
    /// Same as [`TreeConfig::load_from_file`].
    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, MetricTreeError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Configuration for tests: every build is verified.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the preset values are valid.
    pub fn for_testing() -> Result<Self, MetricTreeError> {
        Self::builder().name("test_tree").verify_after_build(true).radius_tolerance(1e-7).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = TreeConfig::default();
        assert_eq!(config.name, "metric_tree");
        assert!(!config.verify_after_build);
        assert_eq!(config.radius_tolerance, 1e-9);
        assert_eq!(config.default_k, 10);
    }

    #[test]
    fn test_config_builder() {
        let config = TreeConfig::builder()
            .name("points")
            .verify_after_build(true)
            .radius_tolerance(1e-6)
            .default_k(3)
            .build()
            .unwrap();

        assert_eq!(config.name, "points");
        assert!(config.verify_after_build);
        assert_eq!(config.radius_tolerance, 1e-6);
        assert_eq!(config.default_k, 3);
    }

    #[test]
    fn test_config_validation() {
        assert!(TreeConfig::builder().default_k(0).build().is_err());
        assert!(TreeConfig::builder().radius_tolerance(-1.0).build().is_err());
        assert!(TreeConfig::builder().radius_tolerance(f64::NAN).build().is_err());
        assert!(TreeConfig::builder().name("  ").build().is_err());
        assert!(TreeConfig::builder().build().is_ok());
    }

    #[test]
    fn test_testing_preset() {
        let config = TreeConfig::for_testing().unwrap();
        assert!(config.verify_after_build);
        assert_eq!(config.name, "test_tree");
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name = \"from_file\"").unwrap();
        writeln!(file, "default_k = 4").unwrap();
        file.flush().unwrap();

        let config = TreeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.name, "from_file");
        assert_eq!(config.default_k, 4);
        // Unspecified fields fall back to defaults
        assert!(!config.verify_after_build);
        assert_eq!(config.radius_tolerance, 1e-9);
    }

    #[test]
    fn test_load_config_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_k = 0").unwrap();
        file.flush().unwrap();

        match TreeConfig::load_from_file(file.path()) {
            Err(MetricTreeError::Configuration(msg)) => assert!(msg.contains("default_k")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name = ").unwrap();
        file.flush().unwrap();

        match TreeConfig::load_from_file(file.path()) {
            Err(MetricTreeError::Configuration(msg)) => assert!(msg.contains("Failed to parse")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = TreeConfig::load_from_file(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, TreeConfig::default());

        assert_eq!(TreeConfig::load_or_default(None).unwrap(), TreeConfig::default());
    }
}
