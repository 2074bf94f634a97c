//! Realignment of grouped results to the original row order

use std::fmt::Debug;

use crate::core::error::{Error, Result};
use crate::core::index::RowIndex;
use crate::series::Series;

/// One computed value tagged with its partition and original row id
#[derive(Debug, Clone)]
pub struct GroupedEntry<T> {
    pub partition: usize,
    pub row: usize,
    pub value: T,
}

/// Results in sort-then-group order, as the window computations emit them
#[derive(Debug, Clone)]
pub struct GroupedValues<T> {
    entries: Vec<GroupedEntry<T>>,
}

impl<T> GroupedValues<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, partition: usize, row: usize, value: T) {
        self.entries.push(GroupedEntry {
            partition,
            row,
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the partition level, keeping `(row id, value)` pairs
    pub fn drop_group_level(self) -> Vec<(usize, T)> {
        self.entries.into_iter().map(|e| (e.row, e.value)).collect()
    }
}

/// Place every value back at its original row position
pub fn restore_original_order<T>(
    pairs: Vec<(usize, T)>,
    index: &RowIndex,
    name: Option<String>,
) -> Result<Series<T>>
where
    T: Debug + Clone,
{
    let mut slots: Vec<Option<T>> = (0..index.len()).map(|_| None).collect();
    for (row, value) in pairs {
        let slot = slots.get_mut(row).ok_or_else(|| {
            Error::Consistency(format!(
                "row id {} outside of index of length {}",
                row,
                index.len()
            ))
        })?;
        if slot.is_some() {
            return Err(Error::Consistency(format!("row id {} computed twice", row)));
        }
        *slot = Some(value);
    }

    let values = slots
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| Error::Consistency(format!("no result for row id {}", row)))
        })
        .collect::<Result<Vec<T>>>()?;

    Series::with_index(values, index.clone(), name)
}

/// Drop the partition level, then restore the original order
pub fn realign<T>(grouped: GroupedValues<T>, index: &RowIndex, name: Option<String>) -> Result<Series<T>>
where
    T: Debug + Clone,
{
    restore_original_order(grouped.drop_group_level(), index, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realign_restores_input_order() {
        let mut grouped = GroupedValues::with_capacity(3);
        grouped.push(0, 2, "c");
        grouped.push(0, 0, "a");
        grouped.push(1, 1, "b");

        let index = RowIndex::from_labels(vec![10, 20, 30]);
        let series = realign(grouped, &index, Some("x".to_string())).unwrap();
        assert_eq!(series.values(), &["a", "b", "c"]);
        assert_eq!(series.index().labels(), &[10, 20, 30]);
    }

    #[test]
    fn test_missing_row_is_consistency_error() {
        let mut grouped = GroupedValues::with_capacity(1);
        grouped.push(0, 0, 1.0);
        let err = realign(grouped, &RowIndex::from_len(2), None).unwrap_err();
        assert!(matches!(err, Error::Consistency(_)));
    }
}
