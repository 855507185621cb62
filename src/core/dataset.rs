// src/core/dataset.rs

//! Append-only, ID-indexed element storage.
//!
//! A `DataSet` collects payloads and hands out zero-based `ElementId`s. Before
//! it is sealed, IDs are not stable: `remove` swaps the last element into the
//! freed slot. Once sealed, size and IDs are frozen and the set can be indexed.

use crate::core::common::{MetricTreeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Stable identity of an element inside a sealed `DataSet`.
///
/// Identity is by ID, never by payload equality: two equal payloads added
/// twice are two distinct elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(usize);

impl ElementId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based position of the element in its data set.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for ElementId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Append-only element collection that must be sealed before indexing.
#[derive(Debug, Clone)]
pub struct DataSet<T> {
    elements: Vec<T>,
    sealed: bool,
}

impl<T> Default for DataSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DataSet<T> {
    /// Creates an empty, unsealed data set.
    #[must_use]
    pub const fn new() -> Self {
        Self { elements: Vec::new(), sealed: false }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { elements: Vec::with_capacity(capacity), sealed: false }
    }

    /// Collects the payloads in order and seals the result.
    pub fn from_payloads<I: IntoIterator<Item = T>>(payloads: I) -> Self {
        let mut data = Self { elements: payloads.into_iter().collect(), sealed: false };
        data.seal();
        data
    }

    /// Appends a payload and returns its ID.
    ///
    /// # Errors
    /// Returns `MetricTreeError::DataSetSealed` once the set is sealed.
    pub fn add(&mut self, payload: T) -> Result<ElementId> {
        if self.sealed {
            return Err(MetricTreeError::DataSetSealed);
        }
        self.elements.push(payload);
        Ok(ElementId(self.elements.len() - 1))
    }

    /// Removes an element before sealing.
    ///
    /// The last element is moved into the freed slot, so its ID changes.
    ///
    /// # Errors
    /// Returns `MetricTreeError::DataSetSealed` once the set is sealed, or
    /// `MetricTreeError::ElementNotFound` for an out-of-range ID.
    pub fn remove(&mut self, id: ElementId) -> Result<T> {
        if self.sealed {
            return Err(MetricTreeError::DataSetSealed);
        }
        if id.0 >= self.elements.len() {
            return Err(MetricTreeError::ElementNotFound(id));
        }
        Ok(self.elements.swap_remove(id.0))
    }

    /// Freezes membership and IDs. Sealing twice is a no-op.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.elements.get(id.0)
    }

    /// Iterates `(id, payload)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &T)> + '_ {
        self.elements.iter().enumerate().map(|(i, payload)| (ElementId(i), payload))
    }

    /// All IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.elements.len()).map(ElementId)
    }
}

impl DataSet<Vec<f64>> {
    /// Reads a JSON array of coordinate arrays, e.g. `[[0,0],[1,2]]`, into a
    /// sealed data set.
    ///
    /// # Errors
    /// `Io` when the file cannot be read, `Json` when it is not an array of
    /// number arrays, and `InvalidInput` when the points differ in dimension.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let points: Vec<Vec<f64>> = serde_json::from_str(&contents)?;

        if let Some(first) = points.first() {
            if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| p.len() != first.len()) {
                return Err(MetricTreeError::InvalidInput {
                    message: format!("point {} has {} coordinates, expected {}", i, p.len(), first.len()),
                });
            }
        }
        Ok(Self::from_payloads(points))
    }

    /// Coordinates per point, `None` for an empty set.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.elements.first().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut data = DataSet::new();
        assert_eq!(data.add("a").unwrap(), ElementId::new(0));
        assert_eq!(data.add("b").unwrap(), ElementId::new(1));
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(ElementId::new(1)), Some(&"b"));
        assert_eq!(data.get(ElementId::new(2)), None);
    }

    #[test]
    fn test_sealed_set_rejects_mutation() {
        let mut data = DataSet::new();
        data.add(1.0).unwrap();
        data.seal();
        assert!(data.is_sealed());
        assert!(matches!(data.add(2.0), Err(MetricTreeError::DataSetSealed)));
        assert!(matches!(data.remove(ElementId::new(0)), Err(MetricTreeError::DataSetSealed)));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_remove_before_seal_moves_last_element() {
        let mut data = DataSet::new();
        data.add("a").unwrap();
        data.add("b").unwrap();
        data.add("c").unwrap();

        assert_eq!(data.remove(ElementId::new(0)).unwrap(), "a");
        // "c" took over the freed ID
        assert_eq!(data.get(ElementId::new(0)), Some(&"c"));
        assert_eq!(data.len(), 2);

        match data.remove(ElementId::new(5)) {
            Err(MetricTreeError::ElementNotFound(id)) => assert_eq!(id.index(), 5),
            other => panic!("Expected ElementNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_from_payloads_is_sealed_and_ordered() {
        let data = DataSet::from_payloads(vec![10, 20, 30]);
        assert!(data.is_sealed());
        let collected: Vec<(usize, i32)> = data.iter().map(|(id, v)| (id.index(), *v)).collect();
        assert_eq!(collected, vec![(0, 10), (1, 20), (2, 30)]);
        assert_eq!(data.ids().count(), 3);
    }

    #[test]
    fn test_from_json_file() {
        let file = json_file("[[0, 0], [1.5, -2], [3, 4]]");
        let data = DataSet::from_json_file(file.path()).unwrap();
        assert!(data.is_sealed());
        assert_eq!(data.len(), 3);
        assert_eq!(data.dimension(), Some(2));
        assert_eq!(data.get(ElementId::new(1)), Some(&vec![1.5, -2.0]));

        let empty = DataSet::from_json_file(json_file("[]").path()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.dimension(), None);
    }

    #[test]
    fn test_from_json_file_errors() {
        let ragged = json_file("[[0, 0], [1, 2, 3]]");
        match DataSet::from_json_file(ragged.path()) {
            Err(MetricTreeError::InvalidInput { message }) => assert!(message.contains("point 1")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        let malformed = json_file("{\"points\": 3}");
        assert!(matches!(DataSet::from_json_file(malformed.path()), Err(MetricTreeError::Json(_))));

        let missing = Path::new("/nonexistent/metrictree/points.json");
        assert!(matches!(DataSet::from_json_file(missing), Err(MetricTreeError::Io(_))));
    }
}
