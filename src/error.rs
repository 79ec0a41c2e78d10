//! Error types for spexpr

use crate::sparse::StorageFormat;
use thiserror::Error;

/// Result type alias using spexpr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or evaluating expressions
///
/// Every variant is raised synchronously, at construction or at the start of an
/// evaluation. Coefficient reads never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Storage format is not usable where it was requested
    #[error("Format mismatch: expected {expected}, got {got}")]
    FormatMismatch {
        /// The format the operation requires
        expected: StorageFormat,
        /// The format that was supplied
        got: StorageFormat,
    },

    /// Expression extents disagree with a sparsity pattern
    #[error("Dimension mismatch: sparsity pattern is {expected:?}, expression is {got:?}")]
    DimensionMismatch {
        /// Pattern shape as [rows, cols]
        expected: [usize; 2],
        /// Expression shape as [rows, cols]
        got: [usize; 2],
    },

    /// Operand shapes disagree (including batch counts and buffer lengths)
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// A sparse destination and a sparse source use different structures
    #[error("Pattern mismatch: source and destination have different sparsity structures")]
    PatternMismatch,

    /// Outer/inner index arrays do not describe a valid structure
    #[error("Invalid sparsity pattern: {reason}")]
    InvalidPattern {
        /// What is wrong with the index arrays
        reason: String,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Size of the dimension
        size: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Why the argument is invalid
        reason: String,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
