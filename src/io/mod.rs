pub mod csv;

// Re-export commonly used functions
pub use csv::{read_csv, read_csv_from_reader, write_csv};
