//! Partitioned-ordered view of a frame
//!
//! Rows are stably sorted by the order column and then split into
//! partitions by exact equality of the partition-key tuple. Rows inside a
//! partition keep the sort order.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::data_value::{Value, ValueDomain};
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::window::spec::WindowSpec;

/// Values of the partition columns for one partition
pub type PartitionKey = Vec<Value>;

/// A single partition: its key and its row ids in sorted order
#[derive(Debug, Clone)]
pub struct Partition {
    key: PartitionKey,
    rows: Vec<usize>,
}

impl Partition {
    pub fn key(&self) -> &PartitionKey {
        &self.key
    }

    /// Row ids (original positions) in sort order
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Immutable partitioned-ordered view built once per accessor
#[derive(Debug, Clone)]
pub struct PartitionedView {
    partitions: Vec<Partition>,
    rows: usize,
}

impl PartitionedView {
    /// Sort `data` by the order column and group it by the partition columns
    pub fn build(data: &DataFrame, spec: &WindowSpec) -> Result<Self> {
        for column in spec
            .partition_by()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(spec.order_by()))
        {
            if !data.contains_column(column) {
                return Err(Error::ConfigurationError(format!(
                    "column '{}' not found in dataset",
                    column
                )));
            }
        }

        let order_values = data.column(spec.order_by())?.values();
        check_order_domain(spec.order_by(), order_values)?;

        let mut sorted: Vec<usize> = (0..data.row_count()).collect();
        let ascending = spec.ascending();
        // slice::sort_by is stable: ties keep dataset order in both directions
        sorted.sort_by(|&a, &b| compare_order(&order_values[a], &order_values[b], ascending));

        let key_columns = spec
            .partition_by()
            .iter()
            .map(|c| data.column(c).map(|s| s.values()))
            .collect::<Result<Vec<&[Value]>>>()?;

        let mut partitions: Vec<Partition> = Vec::new();
        let mut lookup: HashMap<PartitionKey, usize> = HashMap::new();

        for row in sorted {
            let key: PartitionKey = key_columns.iter().map(|c| c[row].clone()).collect();
            let partition = match lookup.get(&key) {
                Some(&p) => p,
                None => {
                    let p = partitions.len();
                    partitions.push(Partition {
                        key: key.clone(),
                        rows: Vec::new(),
                    });
                    lookup.insert(key, p);
                    p
                }
            };
            partitions[partition].rows.push(row);
        }

        Ok(Self {
            partitions,
            rows: data.row_count(),
        })
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Number of rows covered by the view
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Order comparison used for sorting: missing values always last
fn compare_order(a: &Value, b: &Value, ascending: bool) -> Ordering {
    // domains were checked when the view was built
    let ord = a.try_cmp(b).unwrap_or(Ordering::Equal);
    if ascending || a.is_missing() || b.is_missing() {
        ord
    } else {
        ord.reverse()
    }
}

/// Whether two order values tie
pub(crate) fn order_ties(a: &Value, b: &Value) -> bool {
    compare_order(a, b, true) == Ordering::Equal
}

fn check_order_domain(column: &str, values: &[Value]) -> Result<()> {
    let mut domain: Option<ValueDomain> = None;
    for value in values {
        match (domain, value.domain()) {
            (_, None) => {}
            (None, Some(d)) => domain = Some(d),
            (Some(expected), Some(found)) if expected != found => {
                return Err(Error::Domain(format!(
                    "order column '{}' mixes {} and {} values",
                    column, expected, found
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column("g".to_string(), vec!["A", "B", "A", "A"])
            .unwrap();
        df.add_column("t".to_string(), vec![2, 1, 1, 2]).unwrap();
        df
    }

    fn partition_a(view: &PartitionedView) -> &Partition {
        view.partitions()
            .iter()
            .find(|p| p.key() == &vec![Value::from("A")])
            .unwrap()
    }

    #[test]
    fn test_stable_sort_within_partition() {
        let spec = WindowSpec::builder("g", "t").build().unwrap();
        let view = PartitionedView::build(&frame(), &spec).unwrap();

        assert_eq!(view.num_partitions(), 2);
        assert_eq!(view.len(), 4);
        // t=1 first, then the two t=2 rows in dataset order
        assert_eq!(partition_a(&view).rows(), &[2, 0, 3]);
    }

    #[test]
    fn test_descending_keeps_ties_stable() {
        let spec = WindowSpec::builder("g", "t")
            .ascending(false)
            .build()
            .unwrap();
        let view = PartitionedView::build(&frame(), &spec).unwrap();
        assert_eq!(partition_a(&view).rows(), &[0, 3, 2]);
    }

    #[test]
    fn test_missing_order_values_sort_last() {
        let one = Value::Int64(1);
        let two = Value::Int64(2);
        let nan = Value::Float64(f64::NAN);
        for ascending in [true, false] {
            assert_eq!(compare_order(&Value::Null, &one, ascending), Ordering::Greater);
            assert_eq!(compare_order(&two, &nan, ascending), Ordering::Less);
            assert_eq!(compare_order(&Value::Null, &nan, ascending), Ordering::Equal);
        }
        assert_eq!(compare_order(&one, &two, false), Ordering::Greater);
        assert!(order_ties(&Value::Null, &nan));
    }

    #[test]
    fn test_mixed_order_domain_rejected() {
        let mut df = DataFrame::new();
        df.add_column("g".to_string(), vec!["A", "A"]).unwrap();
        df.add_column(
            "t".to_string(),
            vec![Value::Int64(1), Value::from("later")],
        )
        .unwrap();
        let spec = WindowSpec::builder("g", "t").build().unwrap();
        let err = PartitionedView::build(&df, &spec).unwrap_err();
        assert!(matches!(err, Error::Domain(_)));
    }

    #[test]
    fn test_missing_column_is_configuration_error() {
        let spec = WindowSpec::builder("missing", "t").build().unwrap();
        let err = PartitionedView::build(&frame(), &spec).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }
}
