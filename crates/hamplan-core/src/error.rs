//! Unified error types for the hamplan ecosystem
//!
//! This module provides a common error type [`HamplanError`] that can
//! represent errors from any part of the system. Component-specific error
//! types convert into `HamplanError` for uniform handling at API boundaries.

use thiserror::Error;

use crate::schedule::ScheduleError;

/// Errors from core data-model construction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Triplet index outside the declared matrix dimension
    #[error("Entry ({row}, {col}) outside {dim}x{dim} operator")]
    IndexOutOfRange { row: usize, col: usize, dim: usize },

    /// Operands of an elementwise operation have different dimensions
    #[error("Operator dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Block sequence indices are not strictly increasing
    #[error("Block group '{group}': sequence indices out of order at position {position}")]
    UnorderedBlocks { group: String, position: usize },

    /// Block row ranges overlap or are out of order
    #[error("Block group '{group}': row ranges overlap at sequence index {seq}")]
    OverlappingBlocks { group: String, seq: usize },

    /// Block matrix dimension differs from the group's declared dimension
    #[error("Block group '{group}': block {seq} has dimension {found}, expected {expected}")]
    BlockDimensionMismatch {
        group: String,
        seq: usize,
        found: usize,
        expected: usize,
    },
}

/// Unified error type for all hamplan operations.
#[derive(Debug, Error)]
pub enum HamplanError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core data-model errors
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Schedule descriptor errors
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using HamplanError.
pub type HamplanResult<T> = Result<T, HamplanError>;

impl From<anyhow::Error> for HamplanError {
    fn from(err: anyhow::Error) -> Self {
        HamplanError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for HamplanError {
    fn from(err: serde_json::Error) -> Self {
        HamplanError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::DimensionMismatch { left: 4, right: 6 };
        assert!(err.to_string().contains("4 vs 6"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HamplanError = io_err.into();
        assert!(matches!(err, HamplanError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> Result<(), CoreError> {
            Err(CoreError::IndexOutOfRange {
                row: 5,
                col: 0,
                dim: 4,
            })
        }

        fn outer() -> HamplanResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(HamplanError::Core(_))));
    }
}
