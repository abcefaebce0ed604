//! Error types for trim configuration and setup.

use rt_core::RtError;
use thiserror::Error;

/// Problems found while reading a trim dictionary.
///
/// All of these are fatal at load time, before any stepping begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Keyword '{key}' is undefined in dictionary '{dict}'")]
    MissingKey { dict: String, key: String },

    #[error("Invalid value for '{dict}.{key}': {what}")]
    InvalidValue {
        dict: String,
        key: String,
        what: String,
    },

    #[error("Entry '{dict}' is not a dictionary")]
    NotADictionary { dict: String },

    #[error("Unknown trim model '{name}', valid models are: {}", known.join(", "))]
    UnknownStrategy { name: String, known: Vec<String> },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type TrimResult<T> = Result<T, TrimError>;

impl From<TrimError> for RtError {
    fn from(e: TrimError) -> Self {
        match e {
            TrimError::Config(c) => RtError::Config {
                what: c.to_string(),
            },
        }
    }
}
