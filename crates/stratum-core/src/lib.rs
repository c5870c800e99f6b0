//! Stratum core scalars.
//!
//! Shared building blocks for the array engine (`stratum-array`) and the
//! vector layer (`stratum-vector`).
//!
//! # Missing values
//!
//! Missing values (NA) are encoded in-band with a sentinel per primitive kind,
//! so buffers of numbers never need to be boxed:
//!
//! | Kind | Sentinel | Predicate |
//! |------|----------|-----------|
//! | `f64` | `0x7ff0000000000009` | NaN whose low nibble is `9` |
//! | `f32` | `0xff800009` | NaN whose low nibble is `9` |
//! | `i32` | `i32::MIN` | equality |
//! | `i64` | `i64::MAX` | equality |
//! | [`Logical`] | `Logical::Na` | equality |
//! | [`Complex`] | `(NA, NA)` | either part is NA |
//!
//! An ordinary NaN (for example `0.0 / 0.0`) is *not* NA.
//!
//! # Conversions
//!
//! [`FromNa`] converts between kinds and always maps NA to NA. Lossy
//! conversions never saturate or default to zero; they produce NA.
//!
//! # Configuration
//!
//! [`Options`] carries process-wide tunables such as the initial builder
//! capacity and printing precision. It is loaded from TOML or built in code.

#![warn(missing_docs)]

pub mod complex;
pub mod config;
pub mod convert;
pub mod logical;
pub mod na;

pub use complex::{Complex, ParseComplexError};
pub use config::{ConfigError, Options};
pub use convert::{FromNa, IntoNa};
pub use logical::{Logical, ParseLogicalError};
pub use na::NaValue;
