use std::collections::HashMap;

use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::core::index::RowIndex;
use crate::series::Series;

/// DataFrame struct: Column-oriented 2D data structure
#[derive(Debug, Clone)]
pub struct DataFrame {
    columns: HashMap<String, Series<Value>>,
    column_order: Vec<String>,
    index: RowIndex,
}

impl DataFrame {
    /// Create a new empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            column_order: Vec::new(),
            index: RowIndex::default(),
        }
    }

    /// Check if the DataFrame contains a column with the given name
    pub fn contains_column(&self, column_name: &str) -> bool {
        self.columns.contains_key(column_name)
    }

    /// Get the number of rows in the DataFrame
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Get the number of columns in the DataFrame
    pub fn column_count(&self) -> usize {
        self.column_order.len()
    }

    /// Get column names in insertion order
    pub fn column_names(&self) -> Vec<String> {
        self.column_order.clone()
    }

    /// Row labels of the DataFrame
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Add a column built from plain values
    pub fn add_column<T: Into<Value>>(&mut self, column_name: String, values: Vec<T>) -> Result<()> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let series = Series::new(values, Some(column_name.clone()))?;
        self.add_series(column_name, series)
    }

    /// Add an existing series as a column. The series is re-labelled with
    /// the frame's index.
    pub fn add_series(&mut self, column_name: String, series: Series<Value>) -> Result<()> {
        if self.contains_column(&column_name) {
            return Err(Error::DuplicateColumnName(column_name));
        }

        let series_len = series.len();
        if self.column_order.is_empty() {
            if self.index.len() != series_len && !self.index.is_empty() {
                return Err(Error::InconsistentRowCount {
                    expected: self.index.len(),
                    found: series_len,
                });
            }
            if self.index.is_empty() {
                self.index = RowIndex::from_len(series_len);
            }
        } else if series_len != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: series_len,
            });
        }

        let relabelled = Series::with_index(
            series.into_values(),
            self.index.clone(),
            Some(column_name.clone()),
        )?;
        self.columns.insert(column_name.clone(), relabelled);
        self.column_order.push(column_name);
        Ok(())
    }

    /// Replace the row labels
    pub fn set_index(&mut self, labels: Vec<i64>) -> Result<()> {
        if !self.column_order.is_empty() && labels.len() != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: labels.len(),
            });
        }

        self.index = RowIndex::from_labels(labels);
        for (name, series) in self.columns.iter_mut() {
            let values = series.to_vec();
            *series = Series::with_index(values, self.index.clone(), Some(name.clone()))?;
        }
        Ok(())
    }

    /// Builder-style variant of [`DataFrame::set_index`]
    pub fn with_index(mut self, labels: Vec<i64>) -> Result<Self> {
        self.set_index(labels)?;
        Ok(self)
    }

    /// Get a column by name
    pub fn column(&self, column_name: &str) -> Result<&Series<Value>> {
        self.columns
            .get(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}
