//! Window frames: the expanding prefix and the trailing rolling view
//!
//! Both implement [`WindowFrame`], so every aggregate is written once and
//! instantiated with whichever frame the accessor was built with.

use std::ops::Range;

use chrono::Duration;

use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::window::spec::RollingBound;
use crate::window::view::PartitionedView;

/// Strategy that yields the window of a row as positions within its partition
pub trait WindowFrame {
    /// Half-open position range of the window ending at `position`
    fn bounds(&self, partition: usize, position: usize) -> Range<usize>;
}

/// Partition start through the current row
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandingFrame;

impl WindowFrame for ExpandingFrame {
    fn bounds(&self, _partition: usize, position: usize) -> Range<usize> {
        0..position + 1
    }
}

/// Trailing windows, precomputed per row
#[derive(Debug, Clone)]
pub struct RollingView {
    /// Window start position for every (partition, position)
    starts: Vec<Vec<usize>>,
}

impl RollingView {
    /// Build trailing windows over `view`.
    ///
    /// `order_values` is the order column indexed by original row id.
    pub fn build(
        view: &PartitionedView,
        order_values: &[Value],
        bound: RollingBound,
        ascending: bool,
    ) -> Result<Self> {
        let starts = match bound {
            RollingBound::Rows(rows) => row_starts(view, rows),
            RollingBound::Time(window) => time_starts(view, order_values, window, ascending)?,
        };
        Ok(Self { starts })
    }
}

impl WindowFrame for RollingView {
    fn bounds(&self, partition: usize, position: usize) -> Range<usize> {
        self.starts[partition][position]..position + 1
    }
}

fn row_starts(view: &PartitionedView, rows: usize) -> Vec<Vec<usize>> {
    view.partitions()
        .iter()
        .map(|p| (0..p.len()).map(|i| (i + 1).saturating_sub(rows)).collect())
        .collect()
}

// Two-pointer sweep per partition. Sorted timestamps make the start
// monotone in both directions.
fn time_starts(
    view: &PartitionedView,
    order_values: &[Value],
    window: Duration,
    ascending: bool,
) -> Result<Vec<Vec<usize>>> {
    let mut starts = Vec::with_capacity(view.num_partitions());
    for partition in view.partitions() {
        let timestamps = partition
            .rows()
            .iter()
            .map(|&row| {
                order_values[row].as_datetime().ok_or_else(|| {
                    Error::Domain(format!(
                        "time_rolling needs a datetime order column, found {} value",
                        order_values[row].type_name()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut partition_starts = Vec::with_capacity(timestamps.len());
        let mut start = 0;
        for (i, &current) in timestamps.iter().enumerate() {
            while start < i {
                let distance = if ascending {
                    current - timestamps[start]
                } else {
                    timestamps[start] - current
                };
                if distance < window {
                    break;
                }
                start += 1;
            }
            partition_starts.push(start);
        }
        starts.push(partition_starts);
    }
    Ok(starts)
}

/// How the unified aggregates are windowed, fixed at construction
#[derive(Debug, Clone)]
pub enum WindowMode {
    Expanding,
    Rolling(RollingView),
}

impl WindowMode {
    pub fn is_rolling(&self) -> bool {
        matches!(self, WindowMode::Rolling(_))
    }
}
