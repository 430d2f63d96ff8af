//! Error types shared by the lifecycle model, profile loading and the allocator.

use thiserror::Error;

/// Failure of a single lifecycle run (or a single user's run).
///
/// All variants are terminal for the run they occur in.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// A parameter is outside its accepted domain (unknown building function,
    /// non-positive capacity or period, share outside `[0, 1]`, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Hourly input data is missing, unparseable or misaligned.
    #[error("data format error: {0}")]
    DataFormat(String),
    /// An aggregate ratio has a zero denominator.
    #[error("division undefined: {0}")]
    DivisionUndefined(&'static str),
}

impl LifecycleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub(crate) fn data(message: impl Into<String>) -> Self {
        Self::DataFormat(message.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = LifecycleError> = std::result::Result<T, E>;
