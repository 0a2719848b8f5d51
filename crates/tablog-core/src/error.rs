//! Error types for the tablog data logger

use thiserror::Error;

/// Top-level error type for tablog operations
#[derive(Debug, Error)]
pub enum TablogError {
    #[error("Logger error: {0}")]
    Logger(#[from] LoggerError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors produced by the row-commit protocol itself
///
/// The protocol has a single failure condition: a row operation issued in
/// an incompatible open/closed-row state. Everything else (absent storage,
/// negative indices, out-of-range counts) is defined via clamping and
/// never fails.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoggerError {
    /// A row operation was called in the wrong open/closed-row state
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
}

/// Errors produced by persistence sink backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during a store operation
    #[error("Store I/O error: {0}")]
    Io(String),

    /// Store name cannot be mapped to a backing location
    #[error("Invalid store name: {0}")]
    InvalidName(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl StoreError {
    /// Create a new I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Create a new InvalidName error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_error() {
        let err = LoggerError::InvalidState("row already open");
        assert!(err.to_string().contains("row already open"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }

    #[test]
    fn test_nested_conversion() {
        let err: TablogError = LoggerError::InvalidState("no row open").into();
        assert!(matches!(err, TablogError::Logger(_)));

        let err: TablogError = StoreError::io("disk gone").into();
        assert!(matches!(err, TablogError::Store(_)));
    }

    #[test]
    fn test_invalid_name_error() {
        let err = StoreError::invalid_name("../escape");
        assert!(err.to_string().contains("../escape"));
    }
}
