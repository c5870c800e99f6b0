//! Stratum vectors.
//!
//! A [`Vector`] is an immutable, homogeneous column of values with
//! missing-value support. Vectors are produced by a [`Builder`], which grows
//! on demand, pads gaps with NA and coerces whatever it is given into the
//! vector's element kind.
//!
//! # Types
//!
//! [`VectorType`] is a closed set of element kinds:
//!
//! | Type | Storage | Scale |
//! |------|---------|-------|
//! | `Double` | `f64` | numerical |
//! | `Int` | `i32` | numerical |
//! | `Long` | `i64` | numerical |
//! | `Complex` | [`Complex`](stratum_core::Complex) | numerical |
//! | `Logical` | [`Logical`](stratum_core::Logical) | nominal |
//! | `String` | `Option<Arc<str>>` | nominal |
//! | `Object` | [`Value`] | nominal |
//! | `Variable` | [`Value`], any kind per element | nominal |
//!
//! # Coercion
//!
//! Builders never fail on a value. In order they try: NA, a direct or
//! lossless numeric conversion, then a registered [`resolver`]. If all of
//! these fail, the element becomes NA.
//!
//! # Example
//!
//! ```
//! use stratum_vector::{Builder, VectorType};
//!
//! let mut builder = Builder::new(VectorType::Double);
//! builder.set(3, 4.0).set(0, 1.0);
//! let v = builder.build();
//! assert_eq!(v.len(), 4);
//! assert!(v.is_na(1) && v.is_na(2));
//! assert_eq!(v.get_as_int(0).unwrap(), 1);
//! ```

#![warn(missing_docs)]

pub mod builder;
mod coerce;
pub mod combine;
pub mod entry;
pub mod error;
pub mod resolver;
pub mod value;
pub mod vector;
pub mod vector_type;

pub use builder::Builder;
pub use combine::ArithOp;
pub use entry::{DataEntry, StringDataEntry};
pub use error::{VectorError, VectorResult};
pub use value::Value;
pub use vector::{Extract, SortOrder, Vector, VectorElement};
pub use vector_type::{Scale, VectorType};
