//! Config Error Types

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration source couldn't be read or doesn't match the schema.
    #[display("failed to load configuration")]
    Load,
    /// A value was read but is out of range.
    #[display("invalid configuration value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        #[error(not(source))]
        reason: String,
    },
}

impl ErrorKind {
    /// Configuration errors need a human to edit a file or variable first.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
