//! Three-valued logical scalar.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::na;

/// A boolean with a missing state.
///
/// Variants are declared so that the derived ordering places `Na` first,
/// followed by `False` and `True`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Logical {
    /// Missing.
    Na,
    /// False.
    #[default]
    False,
    /// True.
    True,
}

impl Logical {
    /// Converts a plain boolean.
    #[inline]
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value {
            Logical::True
        } else {
            Logical::False
        }
    }

    /// Interprets an integer: NA stays NA, zero is false, anything else true.
    #[inline]
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        if na::is_int(value) {
            Logical::Na
        } else {
            Self::from_bool(value != 0)
        }
    }

    /// Interprets a double: NA or NaN is NA, zero is false, anything else true.
    #[inline]
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Logical::Na
        } else {
            Self::from_bool(value != 0.0)
        }
    }

    /// `1` for true, `0` for false, and the `i32` sentinel for NA.
    #[inline]
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        match self {
            Logical::True => 1,
            Logical::False => 0,
            Logical::Na => na::INT,
        }
    }

    /// The boolean value, or `None` for NA.
    #[inline]
    #[must_use]
    pub const fn to_bool(self) -> Option<bool> {
        match self {
            Logical::True => Some(true),
            Logical::False => Some(false),
            Logical::Na => None,
        }
    }

    /// Returns true only for `True`.
    #[inline]
    pub const fn is_true(self) -> bool {
        matches!(self, Logical::True)
    }

    /// Returns true only for `False`.
    #[inline]
    pub const fn is_false(self) -> bool {
        matches!(self, Logical::False)
    }

    /// Kleene conjunction: false dominates NA.
    #[must_use]
    pub const fn and(self, other: Logical) -> Logical {
        match (self, other) {
            (Logical::False, _) | (_, Logical::False) => Logical::False,
            (Logical::True, Logical::True) => Logical::True,
            _ => Logical::Na,
        }
    }

    /// Kleene disjunction: true dominates NA.
    #[must_use]
    pub const fn or(self, other: Logical) -> Logical {
        match (self, other) {
            (Logical::True, _) | (_, Logical::True) => Logical::True,
            (Logical::False, Logical::False) => Logical::False,
            _ => Logical::Na,
        }
    }
}

impl Not for Logical {
    type Output = Logical;

    fn not(self) -> Logical {
        match self {
            Logical::True => Logical::False,
            Logical::False => Logical::True,
            Logical::Na => Logical::Na,
        }
    }
}

impl BitAnd for Logical {
    type Output = Logical;

    fn bitand(self, rhs: Logical) -> Logical {
        self.and(rhs)
    }
}

impl BitOr for Logical {
    type Output = Logical;

    fn bitor(self, rhs: Logical) -> Logical {
        self.or(rhs)
    }
}

impl From<bool> for Logical {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<Option<bool>> for Logical {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Logical::Na, Self::from_bool)
    }
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Logical::True => "TRUE",
            Logical::False => "FALSE",
            Logical::Na => "NA",
        })
    }
}

/// Error returned when a string is not a logical literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid logical literal `{0}`")]
pub struct ParseLogicalError(pub String);

impl FromStr for Logical {
    type Err = ParseLogicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TRUE" | "True" | "true" | "T" | "t" | "1" => Ok(Logical::True),
            "FALSE" | "False" | "false" | "F" | "f" | "0" => Ok(Logical::False),
            "NA" => Ok(Logical::Na),
            other => Err(ParseLogicalError(other.to_string())),
        }
    }
}
