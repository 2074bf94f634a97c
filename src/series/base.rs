use std::fmt::Debug;

use crate::core::error::{Error, Result};
use crate::core::index::RowIndex;

/// Series struct: 1-dimensional data structure aligned to a [`RowIndex`]
#[derive(Debug, Clone)]
pub struct Series<T>
where
    T: Debug + Clone,
{
    /// The values in the Series
    values: Vec<T>,
    /// Row labels, one per value
    index: RowIndex,
    /// The name of the Series
    name: Option<String>,
}

impl<T> Series<T>
where
    T: Debug + Clone,
{
    /// Create a new Series with a range index
    pub fn new(values: Vec<T>, name: Option<String>) -> Result<Self> {
        let index = RowIndex::from_len(values.len());
        Ok(Self {
            values,
            index,
            name,
        })
    }

    /// Create a Series with a custom index
    pub fn with_index(values: Vec<T>, index: RowIndex, name: Option<String>) -> Result<Self> {
        if values.len() != index.len() {
            return Err(Error::InconsistentRowCount {
                expected: index.len(),
                found: values.len(),
            });
        }

        Ok(Self {
            values,
            index,
            name,
        })
    }

    /// Get the length of the Series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the Series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get an element at a specific position
    pub fn get(&self, position: usize) -> Option<&T> {
        self.values.get(position)
    }

    /// Get a reference to the values in the Series
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Convert Series to Vec
    pub fn to_vec(&self) -> Vec<T> {
        self.values.clone()
    }

    /// Consume the Series and return its values
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Row labels of the Series
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Get the name of the Series
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }
}
