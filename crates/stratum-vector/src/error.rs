//! Vector errors.

use stratum_array::ArrayError;
use thiserror::Error;

use crate::vector_type::VectorType;

/// Errors raised by vectors, builders and data entries.
///
/// Failing to coerce a value while building is not an error: the element is
/// stored as NA instead.
#[derive(Debug, Error)]
pub enum VectorError {
    /// An element index is outside the vector.
    #[error("index {index} out of bounds for vector of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the vector.
        len: usize,
    },

    /// A builder was asked to grow past the longest vector it can hold.
    #[error("index {index} exceeds the maximum vector length {max}")]
    TooLong {
        /// The offending index.
        index: usize,
        /// The largest admissible length.
        max: usize,
    },

    /// Two vectors combined element by element differ in length.
    #[error("vectors of length {left} and {right} cannot be combined")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },

    /// The operation is not defined for this vector type.
    #[error("{operation} is not supported for {vector_type} vectors")]
    Unsupported {
        /// The attempted operation.
        operation: &'static str,
        /// Type of the vector involved.
        vector_type: VectorType,
    },

    /// The vector cannot be viewed as the requested kind.
    #[error("cannot convert a {actual} vector to {expected}")]
    IllegalType {
        /// The requested kind.
        expected: &'static str,
        /// Type of the vector.
        actual: VectorType,
    },

    /// The target kind has no NA, and the element is NA.
    #[error("NA at index {index} cannot be represented as {target}")]
    NaNotRepresentable {
        /// Position of the NA element.
        index: usize,
        /// The requested kind.
        target: &'static str,
    },

    /// Reading from a data entry failed.
    #[error("failed to read entry: {0}")]
    Io(#[from] std::io::Error),

    /// Building an array failed.
    #[error(transparent)]
    Array(#[from] ArrayError),
}

/// Result type for vector operations.
pub type VectorResult<T> = Result<T, VectorError>;
