//! SQL-style window functions over in-memory data frames.
//!
//! Build a [`WindowAccessor`] once per `PARTITION BY ... ORDER BY ...`
//! specification, then query it per column: `lag`/`lead`/`shift`, `last`,
//! `rank`, and expanding or rolling `min`/`max`/`mean`/`sum`/`quantile`/
//! `median`/`var`/`std`. Results always come back in the frame's original row
//! order.

// Core module with fundamental data structures
pub mod core;

pub mod config;
pub mod dataframe;
pub mod io;
pub mod na;
pub mod series;
pub mod window;

// Re-export core types
pub use crate::core::data_value::{Value, ValueDomain};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::index::RowIndex;

pub use config::{AggregationDefaults, LoggingConfig, WindowConfig};
pub use dataframe::DataFrame;
pub use na::NA;
pub use series::Series;
pub use window::{
    Aggregation, Interpolation, QuantileOptions, RankMethod, RollingBound, WindowAccessor,
    WindowMode, WindowSpec,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
