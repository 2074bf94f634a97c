//! Aggregations evaluated over a window of non-missing observations

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AggregationDefaults;
use crate::core::error::{Error, Result};

/// How a quantile between two observations is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Linear,
    Lower,
    Higher,
    Nearest,
    Midpoint,
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "lower" => Ok(Interpolation::Lower),
            "higher" => Ok(Interpolation::Higher),
            "nearest" => Ok(Interpolation::Nearest),
            "midpoint" => Ok(Interpolation::Midpoint),
            other => Err(Error::InvalidValue(format!(
                "unknown interpolation '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interpolation::Linear => "linear",
            Interpolation::Lower => "lower",
            Interpolation::Higher => "higher",
            Interpolation::Nearest => "nearest",
            Interpolation::Midpoint => "midpoint",
        };
        write!(f, "{}", name)
    }
}

/// Quantile parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileOptions {
    pub q: f64,
    pub interpolation: Interpolation,
}

impl QuantileOptions {
    /// Quantile `q` with linear interpolation
    pub fn new(q: f64) -> Self {
        Self {
            q,
            interpolation: Interpolation::Linear,
        }
    }

    /// The 0.5 quantile
    pub fn median() -> Self {
        Self::new(0.5)
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.q) {
            return Err(Error::InvalidValue(format!(
                "quantile must be between 0 and 1, got {}",
                self.q
            )));
        }
        Ok(())
    }
}

/// Window aggregate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregation {
    Min,
    Max,
    Mean,
    Sum,
    Quantile(QuantileOptions),
    Median,
    Var { ddof: usize },
    Std { ddof: usize },
}

impl Aggregation {
    /// Get the string representation of the aggregation
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Mean => "mean",
            Aggregation::Sum => "sum",
            Aggregation::Quantile(_) => "quantile",
            Aggregation::Median => "median",
            Aggregation::Var { .. } => "var",
            Aggregation::Std { .. } => "std",
        }
    }

    /// Resolve an aggregation by name, taking parameters from `defaults`.
    /// `quantile` is not nameable without a `q`; use `q50`-style names
    /// (`q25`, `q90`) for percentiles.
    pub fn from_name(name: &str, defaults: &AggregationDefaults) -> Result<Self> {
        let lowered = name.to_ascii_lowercase();
        let agg = match lowered.as_str() {
            "min" => Aggregation::Min,
            "max" => Aggregation::Max,
            "mean" | "avg" => Aggregation::Mean,
            "sum" => Aggregation::Sum,
            "median" => Aggregation::Median,
            "var" => Aggregation::Var {
                ddof: defaults.ddof,
            },
            "std" => Aggregation::Std {
                ddof: defaults.ddof,
            },
            other => match other.strip_prefix('q').map(str::parse::<u8>) {
                Some(Ok(percent)) if percent <= 100 => Aggregation::Quantile(
                    QuantileOptions::new(percent as f64 / 100.0)
                        .interpolation(defaults.interpolation),
                ),
                _ => {
                    return Err(Error::InvalidValue(format!(
                        "Unsupported operation: {}",
                        name
                    )))
                }
            },
        };
        Ok(agg)
    }

    /// Check parameters before any window is evaluated
    pub fn validate(&self) -> Result<()> {
        match self {
            Aggregation::Quantile(opts) => opts.validate(),
            _ => Ok(()),
        }
    }

    /// Whether the aggregate can be extended one observation at a time
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Aggregation::Min | Aggregation::Max | Aggregation::Mean | Aggregation::Sum
        )
    }

    /// Evaluate over the non-missing observations of one window.
    ///
    /// `window` is scratch space and may be reordered. Returns `None` when
    /// the aggregate is undefined for the window.
    pub fn apply(&self, window: &mut [f64]) -> Option<f64> {
        if window.is_empty() {
            return None;
        }
        match self {
            Aggregation::Min => Some(window.iter().fold(f64::INFINITY, |a, &b| a.min(b))),
            Aggregation::Max => Some(window.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))),
            Aggregation::Sum => Some(window.iter().sum()),
            Aggregation::Mean => Some(window.iter().sum::<f64>() / window.len() as f64),
            Aggregation::Quantile(opts) => Some(quantile(window, opts)),
            Aggregation::Median => Some(quantile(window, &QuantileOptions::median())),
            Aggregation::Var { ddof } => variance(window, *ddof),
            Aggregation::Std { ddof } => variance(window, *ddof).map(f64::sqrt),
        }
    }
}

/// Running state of an expanding window for the [`Aggregation::is_running`]
/// aggregates
#[derive(Debug, Clone, Copy)]
pub struct RunningAggregate {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl RunningAggregate {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add one non-missing observation
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Observations seen so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current value; `None` before the first observation or for
    /// aggregates that need the whole window
    pub fn value(&self, aggregation: &Aggregation) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        match aggregation {
            Aggregation::Min => Some(self.min),
            Aggregation::Max => Some(self.max),
            Aggregation::Sum => Some(self.sum),
            Aggregation::Mean => Some(self.sum / self.count as f64),
            _ => None,
        }
    }
}

impl Default for RunningAggregate {
    fn default() -> Self {
        Self::new()
    }
}

fn variance(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let squares = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
    Some(squares / (values.len() - ddof) as f64)
}

fn quantile(values: &mut [f64], opts: &QuantileOptions) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let pos = opts.q * (values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (pos.ceil() as usize).min(values.len() - 1);
    let frac = pos - lower as f64;
    let (a, b) = (values[lower], values[upper]);

    match opts.interpolation {
        Interpolation::Linear => a + (b - a) * frac,
        Interpolation::Lower => a,
        Interpolation::Higher => b,
        Interpolation::Midpoint => (a + b) / 2.0,
        Interpolation::Nearest => {
            // round half to even, as numpy does
            let nearest = if (frac - 0.5).abs() < f64::EPSILON {
                if lower % 2 == 0 {
                    lower
                } else {
                    upper
                }
            } else if frac < 0.5 {
                lower
            } else {
                upper
            };
            values[nearest]
        }
    }
}
