//! Array shapes.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ArrayError, ArrayResult};

/// Dimension sizes or strides, inline up to rank 4.
pub type Dims = SmallVec<[usize; 4]>;

/// The size of each dimension of an array.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    dims: Dims,
}

impl Shape {
    /// Create a shape from dimension sizes.
    #[must_use]
    pub fn new(dims: impl IntoIterator<Item = usize>) -> Self {
        Self {
            dims: dims.into_iter().collect(),
        }
    }

    /// The rank-0 shape of a single element.
    #[must_use]
    pub fn scalar() -> Self {
        Self { dims: Dims::new() }
    }

    /// A one-dimensional shape.
    #[must_use]
    pub fn vector(len: usize) -> Self {
        Self::new([len])
    }

    /// A two-dimensional shape.
    #[must_use]
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self::new([rows, cols])
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Size of dimension `axis`.
    #[inline]
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// All dimension sizes.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Checks that the shape can back a freshly allocated array: at least one
    /// dimension, and no dimension of size zero.
    pub fn validate(&self) -> ArrayResult<()> {
        if self.dims.is_empty() {
            return Err(ArrayError::InvalidShape {
                shape: self.clone(),
                reason: "rank must be at least one",
            });
        }
        if self.dims.contains(&0) {
            return Err(ArrayError::InvalidShape {
                shape: self.clone(),
                reason: "dimensions must be positive",
            });
        }
        Ok(())
    }

    /// The shape with `axis` removed.
    #[must_use]
    pub fn without(&self, axis: usize) -> Shape {
        Self::new(
            self.dims
                .iter()
                .enumerate()
                .filter(|&(d, _)| d != axis)
                .map(|(_, &n)| n),
        )
    }

    /// The shape with its dimensions in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Shape {
        Self::new(self.dims.iter().rev().copied())
    }
}

impl Index<usize> for Shape {
    type Output = usize;

    fn index(&self, axis: usize) -> &usize {
        &self.dims[axis]
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.iter().copied())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl From<usize> for Shape {
    fn from(len: usize) -> Self {
        Self::vector(len)
    }
}

impl From<&Shape> for Shape {
    fn from(shape: &Shape) -> Self {
        shape.clone()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
