// Core data structures shared by the window engine
pub mod data_value;
pub mod error;
pub mod index;

// Re-exports for convenience
pub use data_value::{Value, ValueDomain};
pub use error::{Error, ErrorKind, Result};
pub use index::RowIndex;
