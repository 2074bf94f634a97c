//! Window specification: PARTITION BY / ORDER BY plus an optional trailing bound
//!
//! A [`WindowSpec`] is validated once when it is built. Giving both a row
//! bound and a time bound is rejected there, before any view exists.

use std::convert::TryFrom;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Trailing bound of a rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingBound {
    /// Last `n` rows up to and including the current row
    Rows(usize),
    /// All rows within the duration, measured along the order column
    Time(Duration),
}

/// One or more partition column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionColumns(Vec<String>);

impl PartitionColumns {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for PartitionColumns {
    fn from(column: &str) -> Self {
        PartitionColumns(vec![column.to_string()])
    }
}

impl From<String> for PartitionColumns {
    fn from(column: String) -> Self {
        PartitionColumns(vec![column])
    }
}

impl From<Vec<String>> for PartitionColumns {
    fn from(columns: Vec<String>) -> Self {
        PartitionColumns(columns)
    }
}

impl From<Vec<&str>> for PartitionColumns {
    fn from(columns: Vec<&str>) -> Self {
        PartitionColumns(columns.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for PartitionColumns {
    fn from(columns: &[&str]) -> Self {
        PartitionColumns(columns.iter().map(|c| c.to_string()).collect())
    }
}

/// Validated window specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowSpecDef", into = "WindowSpecDef")]
pub struct WindowSpec {
    partition_by: Vec<String>,
    order_by: String,
    ascending: bool,
    rolling: Option<RollingBound>,
}

impl WindowSpec {
    /// Start building a specification
    pub fn builder<P, O>(partition_by: P, order_by: O) -> WindowSpecBuilder
    where
        P: Into<PartitionColumns>,
        O: Into<String>,
    {
        WindowSpecBuilder {
            partition_by: partition_by.into().into_vec(),
            order_by: order_by.into(),
            ascending: true,
            rows_rolling: None,
            time_rolling: None,
        }
    }

    pub fn partition_by(&self) -> &[String] {
        &self.partition_by
    }

    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    pub fn rolling(&self) -> Option<RollingBound> {
        self.rolling
    }

    /// Whether a rolling bound was configured
    pub fn is_rolling(&self) -> bool {
        self.rolling.is_some()
    }
}

/// Builder for [`WindowSpec`]
#[derive(Debug, Clone)]
pub struct WindowSpecBuilder {
    partition_by: Vec<String>,
    order_by: String,
    ascending: bool,
    rows_rolling: Option<usize>,
    time_rolling: Option<Duration>,
}

impl WindowSpecBuilder {
    /// Sort direction of the order column
    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Trailing row-count bound
    pub fn rows_rolling(mut self, rows: usize) -> Self {
        self.rows_rolling = Some(rows);
        self
    }

    /// Trailing time bound
    pub fn time_rolling(mut self, window: Duration) -> Self {
        self.time_rolling = Some(window);
        self
    }

    /// Trailing time bound given as an offset alias such as `"10s"`
    pub fn time_rolling_str(self, offset: &str) -> Result<Self> {
        let window = parse_offset(offset)?;
        Ok(self.time_rolling(window))
    }

    /// Validate and build the specification
    pub fn build(self) -> Result<WindowSpec> {
        let rolling = match (self.rows_rolling, self.time_rolling) {
            (Some(_), Some(_)) => {
                return Err(Error::ConfigurationError(
                    "rows_rolling and time_rolling cannot both be specified".to_string(),
                ))
            }
            (Some(0), None) => {
                return Err(Error::ConfigurationError(
                    "rows_rolling must be a positive number of rows".to_string(),
                ))
            }
            (Some(rows), None) => Some(RollingBound::Rows(rows)),
            (None, Some(window)) if window <= Duration::zero() => {
                return Err(Error::ConfigurationError(format!(
                    "time_rolling must be a positive duration, got {}",
                    window
                )))
            }
            (None, Some(window)) => Some(RollingBound::Time(window)),
            (None, None) => None,
        };

        if self.partition_by.is_empty() {
            return Err(Error::ConfigurationError(
                "partition_by needs at least one column".to_string(),
            ));
        }
        if self.partition_by.iter().any(|c| c.is_empty()) || self.order_by.is_empty() {
            return Err(Error::ConfigurationError(
                "column names must not be empty".to_string(),
            ));
        }

        Ok(WindowSpec {
            partition_by: self.partition_by,
            order_by: self.order_by,
            ascending: self.ascending,
            rolling,
        })
    }
}

/// Parse a pandas-style offset alias (`"10s"`, `"5min"`, `"2h"`, `"1d"`,
/// `"500ms"`, `"10 seconds"`) into a duration
pub fn parse_offset(offset: &str) -> Result<Duration> {
    let trimmed = offset.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    let unit = unit.trim();

    let amount: i64 = if digits.is_empty() {
        1
    } else {
        digits
            .parse()
            .map_err(|_| Error::ConfigurationError(format!("invalid offset '{}'", offset)))?
    };

    let duration = match unit {
        "ns" | "N" | "nanosecond" | "nanoseconds" => Duration::nanoseconds(amount),
        "us" | "U" | "microsecond" | "microseconds" => Duration::microseconds(amount),
        "ms" | "L" | "millisecond" | "milliseconds" => Duration::milliseconds(amount),
        "s" | "S" | "sec" | "second" | "seconds" => Duration::seconds(amount),
        "min" | "T" | "minute" | "minutes" => Duration::minutes(amount),
        "h" | "H" | "hour" | "hours" => Duration::hours(amount),
        "d" | "D" | "day" | "days" => Duration::days(amount),
        "w" | "W" | "week" | "weeks" => Duration::weeks(amount),
        _ => {
            return Err(Error::ConfigurationError(format!(
                "unknown offset unit in '{}'",
                offset
            )))
        }
    };

    if duration <= Duration::zero() {
        return Err(Error::ConfigurationError(format!(
            "offset '{}' must be positive",
            offset
        )));
    }
    Ok(duration)
}

/// Render a duration with the largest unit that divides it exactly
pub fn format_offset(duration: Duration) -> String {
    let units: [(i64, &str); 6] = [
        (86_400_000_000_000, "d"),
        (3_600_000_000_000, "h"),
        (60_000_000_000, "min"),
        (1_000_000_000, "s"),
        (1_000_000, "ms"),
        (1_000, "us"),
    ];
    let nanos = match duration.num_nanoseconds() {
        Some(n) => n,
        None => return format!("{}d", duration.num_days()),
    };
    for (size, suffix) in units {
        if nanos % size == 0 {
            return format!("{}{}", nanos / size, suffix);
        }
    }
    format!("{}ns", nanos)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum PartitionDef {
    One(String),
    Many(Vec<String>),
}

// Serialized shape of a WindowSpec, matching the constructor surface
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowSpecDef {
    partition_by: PartitionDef,
    order_by: String,
    #[serde(default = "default_ascending")]
    ascending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rows_rolling: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_rolling: Option<String>,
}

fn default_ascending() -> bool {
    true
}

impl TryFrom<WindowSpecDef> for WindowSpec {
    type Error = Error;

    fn try_from(def: WindowSpecDef) -> Result<Self> {
        let partition_by = match def.partition_by {
            PartitionDef::One(column) => vec![column],
            PartitionDef::Many(columns) => columns,
        };
        let mut builder = WindowSpec::builder(partition_by, def.order_by).ascending(def.ascending);
        if let Some(rows) = def.rows_rolling {
            builder = builder.rows_rolling(rows);
        }
        if let Some(offset) = def.time_rolling {
            builder = builder.time_rolling_str(&offset)?;
        }
        builder.build()
    }
}

impl From<WindowSpec> for WindowSpecDef {
    fn from(spec: WindowSpec) -> Self {
        let (rows_rolling, time_rolling) = match spec.rolling {
            Some(RollingBound::Rows(rows)) => (Some(rows), None),
            Some(RollingBound::Time(window)) => (None, Some(format_offset(window))),
            None => (None, None),
        };
        let partition_by = if spec.partition_by.len() == 1 {
            PartitionDef::One(spec.partition_by[0].clone())
        } else {
            PartitionDef::Many(spec.partition_by)
        };
        WindowSpecDef {
            partition_by,
            order_by: spec.order_by,
            ascending: spec.ascending,
            rows_rolling,
            time_rolling,
        }
    }
}
