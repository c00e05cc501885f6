//! Error types for densa

use crate::handle::Handle;
use thiserror::Error;

/// Result type alias using densa's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in densa operations
///
/// Every failure is returned to the immediate caller. Nothing is printed,
/// retried, or treated as fatal; the embedding layer decides what to do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A shape dimension is zero or negative
    #[error("Invalid shape: dimension {axis} has size {value}, expected a positive integer")]
    InvalidShape {
        /// Position of the offending dimension
        axis: usize,
        /// The rejected dimension value
        value: i64,
    },

    /// Storage for a tensor could not be obtained
    #[error("Allocation failed for shape {shape:?}: {reason}")]
    AllocationFailure {
        /// Shape that was being allocated
        shape: Vec<usize>,
        /// Why the allocation was refused
        reason: String,
    },

    /// Element counts of two operands (or of a tensor and input data) disagree
    #[error("Size mismatch in {op}: expected {expected} elements, got {got}")]
    SizeMismatch {
        /// Operation that detected the mismatch
        op: &'static str,
        /// Element count required by the receiving tensor
        expected: usize,
        /// Element count that was supplied
        got: usize,
    },

    /// A handle was used after release, or was never issued by this registry
    #[error("{handle} is not live (released or never created)")]
    UseAfterRelease {
        /// The rejected handle
        handle: Handle,
    },
}

impl Error {
    /// Create a size mismatch error
    pub fn size_mismatch(op: &'static str, expected: usize, got: usize) -> Self {
        Self::SizeMismatch { op, expected, got }
    }

    /// Create an allocation failure error
    pub fn allocation(shape: &[usize], reason: impl Into<String>) -> Self {
        Self::AllocationFailure {
            shape: shape.to_vec(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidShape { axis: 1, value: -3 };
        assert_eq!(
            err.to_string(),
            "Invalid shape: dimension 1 has size -3, expected a positive integer"
        );

        let err = Error::size_mismatch("add", 4, 3);
        assert_eq!(
            err.to_string(),
            "Size mismatch in add: expected 4 elements, got 3"
        );
    }

    #[test]
    fn test_allocation_helper() {
        let err = Error::allocation(&[2, 3], "budget exhausted");
        match err {
            Error::AllocationFailure { shape, reason } => {
                assert_eq!(shape, vec![2, 3]);
                assert_eq!(reason, "budget exhausted");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
