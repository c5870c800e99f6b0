//! Stratum strided arrays.
//!
//! N-dimensional arrays over flat buffers, with zero-copy views and
//! missing-value aware numerics.
//!
//! # Architecture
//!
//! ```text
//! ArrayFactory ──allocates──▶ Storage<T> ──owned by──▶ Array<T>
//!                                                        │
//!                         view / slice / transpose / select / reshape
//!                                                        ▼
//!                                     ArrayView<'a, T>, ArrayViewMut<'a, T>
//! ```
//!
//! - [`indexer`]: pure index arithmetic (column-major by default)
//! - [`layout`]: shape, stride and offset; every view is a new layout
//! - [`storage`]: element kinds and the `get_element`/`set_element` hooks
//! - [`array`]: the generic [`StridedArray`] and its views
//! - [`numeric`]: NA-propagating arithmetic and reductions
//! - [`routines`]: BLAS-style `dot`, `axpy`, `gemv`, `gemm`, ...
//! - [`linalg`]: decomposition entry points (unsupported)
//! - [`factory`]: [`ArrayFactory`] constructors
//!
//! # Aliasing
//!
//! Views borrow the storage of the array they came from. A mutable view
//! holds the only mutable borrow, so two writers can never alias.
//!
//! # Example
//!
//! ```
//! use stratum_array::{ArrayFactory, SliceRange};
//!
//! let f = ArrayFactory::new();
//! let mut a = f.double_array([2, 3]).unwrap();
//! for i in 0..6 {
//!     a.set(i, (i + 1) as f64).unwrap();
//! }
//! assert_eq!(a.get2(0, 1).unwrap(), 3.0);
//!
//! let mut row = a.slice_mut(&[SliceRange::index(1)]).unwrap();
//! row.assign(0.0);
//! assert_eq!(a.get2(1, 2).unwrap(), 0.0);
//! ```

#![warn(missing_docs)]

pub mod array;
pub mod error;
pub mod factory;
pub mod indexer;
pub mod layout;
pub mod linalg;
pub mod numeric;
mod printer;
pub mod routines;
pub mod shape;
pub mod storage;

pub use array::{
    Array, ArrayView, ArrayViewMut, BitArray, ComplexArray, DoubleArray, IntArray, LogicalArray,
    LongArray, MaskElement, StridedArray,
};
pub use error::{ArrayError, ArrayResult};
pub use factory::ArrayFactory;
pub use indexer::MajorOrder;
pub use layout::{Layout, SliceRange};
pub use linalg::{BaseLinearAlgebra, LinearAlgebraRoutines};
pub use numeric::{NumericElement, RealElement};
pub use routines::{default_routines, ArrayRoutines, BaseRoutines, Op};
pub use shape::Shape;
pub use storage::{Element, ElementAccess, ElementAccessMut, ElementKind, Storage};
