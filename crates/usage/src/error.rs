//! Usage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Most failure paths in this crate deliberately *aren't* errors: unresolved
//! assets and scenes are skipped, and unreadable persisted data reads as an
//! empty database. What's left is what a caller can act on.

use derive_more::{Display, Error};

/// A usage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for usage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The asset identifier doesn't resolve, or nothing was recorded for it.
    #[display("unknown asset: {_0}")]
    UnknownAsset(#[error(not(source))] String),
    /// The asset is part of a sprite sheet (or similar) and can't be resized
    /// on its own.
    #[display("asset cannot be resized individually: {_0}")]
    Ineligible(#[error(not(source))] String),
    /// Recorded usage doesn't warrant a resize.
    #[display("no size mismatch to fix: {_0}")]
    NothingToFix(#[error(not(source))] String),
    /// The configuration handed to the database is out of range.
    #[display("invalid configuration")]
    InvalidConfig,
    /// Usage data could not be serialized.
    #[display("invalid usage data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // An unknown asset may resolve once the host finishes importing it.
        matches!(self, Self::UnknownAsset(_))
    }
}
