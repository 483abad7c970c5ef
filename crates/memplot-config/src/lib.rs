//! Optional TOML configuration for the memplot report tools.
//!
//! Configuration flows through two shapes: a [`raw`] struct in which every
//! field is optional (exactly what the TOML file may say), and a [`validated`]
//! struct with all defaults filled in and invariants checked. CLI flags are
//! merged on top by the binaries.

pub mod raw;
pub mod validated;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in config file: {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Macro to fill unset `Option` fields of a raw config struct in place.
#[macro_export]
macro_rules! fill_default {
    ($s:expr, $( $field:ident : $value:expr ),+ $(,)?) => {
        $(
            if $s.$field.is_none() {
                $s.$field = Some($value);
            }
        )+
    };
}

/// Deserialize a TOML file into `T`.
pub fn load_toml<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
