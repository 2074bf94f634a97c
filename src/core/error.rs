use thiserror::Error;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Consistency error: {0}")]
    Consistency(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The window or library configuration is unusable
    Configuration,
    /// The operation is not available for how the accessor was built
    UnsupportedOperation,
    /// Values are outside the domain the operation works on
    Domain,
    /// Malformed input data or arguments
    Data,
    /// Reading input failed
    Io,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigurationError(_) => ErrorKind::Configuration,
            Error::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            Error::Domain(_) => ErrorKind::Domain,
            Error::Io(_) | Error::Csv(_) => ErrorKind::Io,
            Error::ColumnNotFound(_)
            | Error::DuplicateColumnName(_)
            | Error::InconsistentRowCount { .. }
            | Error::InvalidValue(_)
            | Error::Consistency(_) => ErrorKind::Data,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
