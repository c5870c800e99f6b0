//! Array errors.

use thiserror::Error;

use crate::shape::Shape;

/// Errors raised by array construction, indexing and routines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// Operand shapes do not agree for an operation.
    #[error("non-conformant arguments to {op}: {left} and {right}")]
    NonConformant {
        /// The operation that was attempted.
        op: &'static str,
        /// Shape of the left operand.
        left: Shape,
        /// Shape of the right operand.
        right: Shape,
    },

    /// A flat index is outside `0..bound`.
    #[error("index {index} out of bounds for length {bound}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The exclusive upper bound.
        bound: usize,
    },

    /// A multi-index is outside the shape.
    #[error("index {index:?} out of bounds for shape {shape}")]
    MultiIndexOutOfBounds {
        /// The offending index.
        index: Vec<usize>,
        /// The shape it was checked against.
        shape: Shape,
    },

    /// Element counts differ.
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch {
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        actual: usize,
    },

    /// A shape is not usable for allocation.
    #[error("invalid shape {shape}: {reason}")]
    InvalidShape {
        /// The rejected shape.
        shape: Shape,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A zero-copy reshape was requested on a non-contiguous array.
    #[error("array with shape {shape} and stride {stride:?} is not contiguous")]
    NotContiguous {
        /// Shape of the array.
        shape: Shape,
        /// Stride of the array.
        stride: Vec<usize>,
    },

    /// An axis is outside `0..rank`.
    #[error("axis {axis} out of bounds for rank {rank}")]
    AxisOutOfBounds {
        /// The offending axis.
        axis: usize,
        /// Rank of the array.
        rank: usize,
    },

    /// Axes do not form a permutation of `0..rank`.
    #[error("invalid permutation {0:?}")]
    InvalidPermutation(Vec<usize>),

    /// The operation needs a different rank.
    #[error("rank mismatch: expected {expected}, got {actual}")]
    RankMismatch {
        /// Required rank.
        expected: usize,
        /// Actual rank.
        actual: usize,
    },

    /// An argument is outside the operation's domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation has no implementation.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Result type for array operations.
pub type ArrayResult<T> = Result<T, ArrayError>;
