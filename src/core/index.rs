use std::sync::Arc;

/// Row labels of a [`DataFrame`](crate::DataFrame).
///
/// A row's identity is its position; the labels travel with every result
/// computed from the frame. Clones share the label buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndex {
    labels: Arc<[i64]>,
}

impl RowIndex {
    /// Creates a range index `0..len`
    pub fn from_len(len: usize) -> Self {
        let labels: Vec<i64> = (0..len as i64).collect();
        Self {
            labels: labels.into(),
        }
    }

    /// Creates an index from explicit labels
    pub fn from_labels(labels: Vec<i64>) -> Self {
        Self {
            labels: labels.into(),
        }
    }

    /// Returns the length of the index
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in row order
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }
}

impl Default for RowIndex {
    fn default() -> Self {
        Self::from_len(0)
    }
}
