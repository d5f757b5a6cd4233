//! Error types for S7 data access
//!
//! Exactly three kinds of failure leave this crate: connecting to the
//! device failed, a connected device rejected a read/write, or a malformed
//! address was rejected locally before any I/O. Simulated mode never
//! produces `Connection` or `ReadWrite`.

use thiserror::Error;

/// Result type for s7link operations
pub type Result<T> = std::result::Result<T, S7LinkError>;

/// S7 data-access errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum S7LinkError {
    /// A real-transport connect attempt failed (unreachable host,
    /// refused session, rack/slot mismatch).
    #[error("Connection error: {0}")]
    Connection(String),

    /// A connected transport rejected or failed a read/write.
    /// Carries the failing address (e.g. `DB5.10`, `M0`) for diagnosis.
    #[error("Read/write error at {address}: {message}")]
    ReadWrite {
        /// Rendered address the operation targeted
        address: String,
        /// Underlying transport failure
        message: String,
    },

    /// A malformed address or size was rejected locally before any
    /// transport call was attempted.
    #[error("Validation error: {0}")]
    Validation(String),
}

// Helper methods for creating errors
impl S7LinkError {
    pub fn connection(msg: impl Into<String>) -> Self {
        S7LinkError::Connection(msg.into())
    }

    pub fn read_write(address: impl Into<String>, message: impl Into<String>) -> Self {
        S7LinkError::ReadWrite {
            address: address.into(),
            message: message.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        S7LinkError::Validation(msg.into())
    }

    /// Check if this error came from a failed connect attempt
    pub fn is_connection(&self) -> bool {
        matches!(self, S7LinkError::Connection(_))
    }

    /// Check if this error came from a failed data operation
    pub fn is_read_write(&self) -> bool {
        matches!(self, S7LinkError::ReadWrite { .. })
    }

    /// Check if this error was raised locally, before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, S7LinkError::Validation(_))
    }
}
