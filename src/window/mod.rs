//! SQL-style window functions: PARTITION BY / ORDER BY with offset, rank,
//! expanding and rolling aggregates

pub mod accessor;
pub mod aggregate;
pub mod align;
pub mod rolling;
pub mod spec;
pub mod view;

pub use accessor::{RankMethod, WindowAccessor};
pub use aggregate::{Aggregation, Interpolation, QuantileOptions, RunningAggregate};
pub use rolling::{ExpandingFrame, RollingView, WindowFrame, WindowMode};
pub use spec::{parse_offset, PartitionColumns, RollingBound, WindowSpec, WindowSpecBuilder};
pub use view::{Partition, PartitionKey, PartitionedView};
