//! Process-wide options.
//!
//! Options are plain data: they can be built in code, deserialized from
//! TOML, and installed globally. Readers call [`Options::current`], which
//! returns a snapshot.

use std::path::Path;
use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Initial capacity of a vector builder when none is given.
pub const DEFAULT_BUILDER_CAPACITY: usize = 50;

/// Errors that can occur while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("failed to read options: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML text was malformed.
    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field held a value outside its domain.
    #[error("invalid option `{field}`: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Tunables shared by arrays, vectors and builders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Capacity reserved by a builder created without an explicit size.
    pub builder_initial_capacity: usize,
    /// Digits after the decimal point when printing floating-point arrays.
    pub print_precision: usize,
    /// Elements printed per dimension before the printer elides with `...`.
    pub print_max_per_dimension: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            builder_initial_capacity: DEFAULT_BUILDER_CAPACITY,
            print_precision: 4,
            print_max_per_dimension: 10,
        }
    }
}

fn global() -> &'static RwLock<Options> {
    static OPTIONS: OnceLock<RwLock<Options>> = OnceLock::new();
    OPTIONS.get_or_init(|| RwLock::new(Options::default()))
}

impl Options {
    /// Parse options from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: Options = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Read and parse an options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.builder_initial_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "builder_initial_capacity",
                reason: "must be positive".to_string(),
            });
        }
        if self.print_max_per_dimension == 0 {
            return Err(ConfigError::Invalid {
                field: "print_max_per_dimension",
                reason: "must be positive".to_string(),
            });
        }
        if self.print_precision > 17 {
            return Err(ConfigError::Invalid {
                field: "print_precision",
                reason: format!(
                    "{} exceeds the 17 significant digits of f64",
                    self.print_precision
                ),
            });
        }
        Ok(())
    }

    /// Snapshot of the installed options.
    pub fn current() -> Options {
        global().read().clone()
    }

    /// Validate and install these options process-wide.
    pub fn install(self) -> Result<(), ConfigError> {
        self.validate()?;
        tracing::debug!(options = ?self, "installing options");
        *global().write() = self;
        Ok(())
    }

    /// Restore the default options.
    pub fn reset() {
        *global().write() = Options::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.builder_initial_capacity, 50);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let options = Options::from_toml_str("print_precision = 2").unwrap();
        assert_eq!(options.print_precision, 2);
        assert_eq!(options.builder_initial_capacity, 50);
    }

    #[test]
    fn test_from_toml_rejects_zero_capacity() {
        let err = Options::from_toml_str("builder_initial_capacity = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "builder_initial_capacity",
                ..
            }
        ));
    }

    #[test]
    fn test_from_toml_rejects_unknown_fields() {
        assert!(matches!(
            Options::from_toml_str("colour = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let options = Options {
            print_precision: 6,
            ..Options::default()
        };
        let text = toml::to_string(&options).unwrap();
        assert_eq!(Options::from_toml_str(&text).unwrap(), options);
    }
}
