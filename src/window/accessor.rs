//! The window accessor
//!
//! A [`WindowAccessor`] sorts and partitions a frame once, then answers any
//! number of per-column window queries. Every result is a [`Series`] aligned
//! to the original row order of the frame.
//!
//! # Example
//! ```
//! use sqlwindow::{DataFrame, WindowAccessor, WindowSpec, NA};
//!
//! let mut df = DataFrame::new();
//! df.add_column("g".to_string(), vec!["A", "A", "B", "A"]).unwrap();
//! df.add_column("t".to_string(), vec![1, 2, 1, 3]).unwrap();
//! df.add_column("v".to_string(), vec![10, 20, 5, 30]).unwrap();
//!
//! let spec = WindowSpec::builder("g", "t").build().unwrap();
//! let window = WindowAccessor::new(&df, spec).unwrap();
//!
//! let sums = window.expanding_sum("v").unwrap();
//! assert_eq!(
//!     sums.values(),
//!     &[NA::Value(10.0), NA::Value(30.0), NA::Value(5.0), NA::Value(60.0)]
//! );
//! ```

use std::str::FromStr;

use crate::config::WindowConfig;
use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::na::NA;
use crate::series::Series;
use crate::window::aggregate::{Aggregation, QuantileOptions, RunningAggregate};
use crate::window::align::{realign, GroupedValues};
use crate::window::rolling::{ExpandingFrame, RollingView, WindowFrame, WindowMode};
use crate::window::spec::{RollingBound, WindowSpec};
use crate::window::view::{order_ties, PartitionedView};

/// Tie-break rule for [`WindowAccessor::rank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMethod {
    /// Unique ranks, ties broken by stable sort position
    #[default]
    First,
    /// Lowest rank of the tie group
    Min,
    /// Highest rank of the tie group
    Max,
    /// Like `Min`, but groups are numbered without gaps
    Dense,
    /// Mean rank of the tie group, truncated to an integer
    Average,
}

impl FromStr for RankMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(RankMethod::First),
            "min" => Ok(RankMethod::Min),
            "max" => Ok(RankMethod::Max),
            "dense" => Ok(RankMethod::Dense),
            "average" => Ok(RankMethod::Average),
            other => Err(Error::InvalidValue(format!(
                "unknown rank method '{}'",
                other
            ))),
        }
    }
}

/// SQL-style window functions over one partition/order specification
#[derive(Debug, Clone)]
pub struct WindowAccessor {
    frame: DataFrame,
    spec: WindowSpec,
    config: WindowConfig,
    view: PartitionedView,
    mode: WindowMode,
}

impl WindowAccessor {
    /// Build the accessor with the default configuration
    pub fn new(data: &DataFrame, spec: WindowSpec) -> Result<Self> {
        Self::with_config(data, spec, WindowConfig::default())
    }

    /// Build the accessor. The frame is snapshotted; later changes to
    /// `data` are not observed.
    pub fn with_config(data: &DataFrame, spec: WindowSpec, config: WindowConfig) -> Result<Self> {
        config.validate()?;

        let view = PartitionedView::build(data, &spec)?;
        let mode = match spec.rolling() {
            Some(bound) => {
                if let (RollingBound::Time(_), false) = (bound, spec.ascending()) {
                    log::warn!(
                        "time_rolling on descending '{}': windows trail in sort order, covering [t, t + window)",
                        spec.order_by()
                    );
                }
                let order_values = data.column(spec.order_by())?.values();
                WindowMode::Rolling(RollingView::build(
                    &view,
                    order_values,
                    bound,
                    spec.ascending(),
                )?)
            }
            None => WindowMode::Expanding,
        };

        log::debug!(
            "window over {} rows: {} partitions by {:?}, ordered by '{}' ({}), {}",
            view.len(),
            view.num_partitions(),
            spec.partition_by(),
            spec.order_by(),
            if spec.ascending() { "asc" } else { "desc" },
            if mode.is_rolling() { "rolling" } else { "expanding" }
        );

        Ok(Self {
            frame: data.clone(),
            spec,
            config,
            view,
            mode,
        })
    }

    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Whether unified aggregates use the rolling window
    pub fn is_rolling(&self) -> bool {
        self.mode.is_rolling()
    }

    pub fn num_partitions(&self) -> usize {
        self.view.num_partitions()
    }

    // ---- offset and rank operations ----

    /// Value of `column` from `periods` rows earlier in the partition;
    /// negative `periods` looks forward. Out of range rows are `Null`.
    pub fn shift(&self, column: &str, periods: i64) -> Result<Series<Value>> {
        self.trace("shift", column);
        let values = self.frame.column(column)?.values();
        let mut grouped = GroupedValues::with_capacity(values.len());

        for (p, partition) in self.view.partitions().iter().enumerate() {
            let rows = partition.rows();
            for (position, &row) in rows.iter().enumerate() {
                let source = (position as i64)
                    .checked_sub(periods)
                    .and_then(|s| usize::try_from(s).ok())
                    .filter(|&s| s < rows.len());
                let value = match source {
                    Some(s) => values[rows[s]].clone(),
                    None => Value::Null,
                };
                grouped.push(p, row, value);
            }
        }

        realign(grouped, self.frame.index(), Some(column.to_string()))
    }

    /// Alias of [`shift`](Self::shift)
    pub fn lag(&self, column: &str, periods: i64) -> Result<Series<Value>> {
        self.shift(column, periods)
    }

    /// `shift` with the direction reversed
    pub fn lead(&self, column: &str, periods: i64) -> Result<Series<Value>> {
        // i64::MIN has no negation; any lag that large is out of range anyway
        self.shift(column, periods.checked_neg().unwrap_or(i64::MAX))
    }

    /// Last non-missing value strictly before each row, within its partition
    pub fn last(&self, column: &str) -> Result<Series<Value>> {
        self.trace("last", column);
        let values = self.frame.column(column)?.values();
        let mut grouped = GroupedValues::with_capacity(values.len());

        for (p, partition) in self.view.partitions().iter().enumerate() {
            let mut seen = Value::Null;
            for &row in partition.rows() {
                grouped.push(p, row, seen.clone());
                if !values[row].is_missing() {
                    seen = values[row].clone();
                }
            }
        }

        realign(grouped, self.frame.index(), Some(column.to_string()))
    }

    /// 1-based rank of each row by the order column within its partition
    pub fn rank(&self, method: RankMethod) -> Result<Series<i64>> {
        let order_column = self.spec.order_by();
        self.trace("rank", order_column);
        let order_values = self.frame.column(order_column)?.values();
        let mut grouped = GroupedValues::with_capacity(order_values.len());

        for (p, partition) in self.view.partitions().iter().enumerate() {
            let rows = partition.rows();
            let mut start = 0;
            let mut dense = 0;
            while start < rows.len() {
                let mut end = start + 1;
                while end < rows.len()
                    && order_ties(&order_values[rows[start]], &order_values[rows[end]])
                {
                    end += 1;
                }
                dense += 1;

                for (offset, &row) in rows[start..end].iter().enumerate() {
                    let rank = match method {
                        RankMethod::First => start + offset + 1,
                        RankMethod::Min => start + 1,
                        RankMethod::Max => end,
                        RankMethod::Dense => dense,
                        RankMethod::Average => (start + 1 + end) / 2,
                    };
                    grouped.push(p, row, rank as i64);
                }
                start = end;
            }
        }

        realign(grouped, self.frame.index(), Some(order_column.to_string()))
    }

    /// Sequential 1..N position per partition
    pub fn count(&self) -> Result<Series<i64>> {
        self.rank(RankMethod::First)
    }

    // ---- generic aggregation entry points ----

    /// Aggregate over the window fixed at construction
    pub fn aggregate(&self, column: &str, aggregation: Aggregation) -> Result<Series<NA<f64>>> {
        match &self.mode {
            WindowMode::Expanding => self.aggregate_expanding(column, aggregation),
            WindowMode::Rolling(rolling) => self.aggregate_over(rolling, column, aggregation),
        }
    }

    /// Aggregate looked up by name (`"mean"`, `"std"`, `"q90"`, ...), with
    /// parameters from the configuration
    pub fn aggregate_by_name(&self, column: &str, name: &str) -> Result<Series<NA<f64>>> {
        let aggregation = Aggregation::from_name(name, &self.config.aggregation)?;
        self.aggregate(column, aggregation)
    }

    /// Aggregate over the expanding window, whatever the mode
    pub fn expanding(&self, column: &str, aggregation: Aggregation) -> Result<Series<NA<f64>>> {
        self.aggregate_expanding(column, aggregation)
    }

    /// Aggregate over the rolling window; fails without a rolling bound
    pub fn rolling(&self, column: &str, aggregation: Aggregation) -> Result<Series<NA<f64>>> {
        let rolling = self.check_rolling()?;
        self.aggregate_over(rolling, column, aggregation)
    }

    fn check_rolling(&self) -> Result<&RollingView> {
        match &self.mode {
            WindowMode::Rolling(rolling) => Ok(rolling),
            WindowMode::Expanding => Err(Error::UnsupportedOperation(
                "rolling operations need rows_rolling or time_rolling at construction".to_string(),
            )),
        }
    }

    fn aggregate_over<F: WindowFrame>(
        &self,
        frame: &F,
        column: &str,
        aggregation: Aggregation,
    ) -> Result<Series<NA<f64>>> {
        aggregation.validate()?;
        self.trace(aggregation.name(), column);

        let values = self.numeric_column(column)?;
        let min_periods = self.config.aggregation.min_periods;
        let mut grouped = GroupedValues::with_capacity(values.len());
        let mut window: Vec<f64> = Vec::new();

        for (p, partition) in self.view.partitions().iter().enumerate() {
            let rows = partition.rows();
            for (position, &row) in rows.iter().enumerate() {
                window.clear();
                window.extend(rows[frame.bounds(p, position)].iter().filter_map(|&r| values[r]));
                let result: NA<f64> = if window.len() >= min_periods {
                    NA::from(aggregation.apply(&mut window))
                } else {
                    NA::NA
                };
                grouped.push(p, row, result);
            }
        }

        realign(grouped, self.frame.index(), Some(column.to_string()))
    }

    // min/max/mean/sum extend in O(1) per row; the rest re-read the prefix
    fn aggregate_expanding(
        &self,
        column: &str,
        aggregation: Aggregation,
    ) -> Result<Series<NA<f64>>> {
        if !aggregation.is_running() {
            return self.aggregate_over(&ExpandingFrame, column, aggregation);
        }
        self.trace(aggregation.name(), column);

        let values = self.numeric_column(column)?;
        let min_periods = self.config.aggregation.min_periods;
        let mut grouped = GroupedValues::with_capacity(values.len());

        for (p, partition) in self.view.partitions().iter().enumerate() {
            let mut running = RunningAggregate::new();
            for &row in partition.rows() {
                if let Some(x) = values[row] {
                    running.push(x);
                }
                let result: NA<f64> = if running.count() >= min_periods {
                    NA::from(running.value(&aggregation))
                } else {
                    NA::NA
                };
                grouped.push(p, row, result);
            }
        }

        realign(grouped, self.frame.index(), Some(column.to_string()))
    }

    fn numeric_column(&self, column: &str) -> Result<Vec<Option<f64>>> {
        self.frame
            .column(column)?
            .values()
            .iter()
            .map(|v| {
                v.to_f64().map_err(|_| {
                    Error::Domain(format!(
                        "column '{}' holds {} values, aggregates need numbers",
                        column,
                        v.type_name()
                    ))
                })
            })
            .collect()
    }

    fn trace(&self, operation: &str, column: &str) {
        if self.config.logging.trace_queries {
            log::trace!("window {} on '{}'", operation, column);
        }
    }

    // ---- expanding family ----

    pub fn expanding_min(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Min)
    }

    pub fn expanding_max(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Max)
    }

    pub fn expanding_mean(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Mean)
    }

    pub fn expanding_sum(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Sum)
    }

    pub fn expanding_quantile(
        &self,
        column: &str,
        options: QuantileOptions,
    ) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Quantile(options))
    }

    pub fn expanding_median(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Median)
    }

    pub fn expanding_var(&self, column: &str, ddof: usize) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Var { ddof })
    }

    pub fn expanding_std(&self, column: &str, ddof: usize) -> Result<Series<NA<f64>>> {
        self.expanding(column, Aggregation::Std { ddof })
    }

    // ---- rolling family ----

    pub fn rolling_min(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Min)
    }

    pub fn rolling_max(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Max)
    }

    pub fn rolling_mean(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Mean)
    }

    pub fn rolling_sum(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Sum)
    }

    pub fn rolling_quantile(
        &self,
        column: &str,
        options: QuantileOptions,
    ) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Quantile(options))
    }

    pub fn rolling_median(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Median)
    }

    pub fn rolling_var(&self, column: &str, ddof: usize) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Var { ddof })
    }

    pub fn rolling_std(&self, column: &str, ddof: usize) -> Result<Series<NA<f64>>> {
        self.rolling(column, Aggregation::Std { ddof })
    }

    // ---- unified family: rolling if a bound was configured, else expanding ----

    pub fn min(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Min)
    }

    pub fn max(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Max)
    }

    pub fn mean(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Mean)
    }

    pub fn sum(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Sum)
    }

    pub fn quantile(&self, column: &str, options: QuantileOptions) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Quantile(options))
    }

    pub fn median(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Median)
    }

    pub fn var(&self, column: &str, ddof: usize) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Var { ddof })
    }

    pub fn std(&self, column: &str, ddof: usize) -> Result<Series<NA<f64>>> {
        self.aggregate(column, Aggregation::Std { ddof })
    }

    /// Running total; always expanding
    pub fn cumsum(&self, column: &str) -> Result<Series<NA<f64>>> {
        self.expanding_sum(column)
    }
}
