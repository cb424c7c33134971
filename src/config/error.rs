//! Configuration error types.

use crate::pattern::PatternError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config field `{0}` holds an unusable pattern")]
    Pattern(&'static str, #[source] PatternError),

    #[error("Config validation error: {0}")]
    Validation(String),
}
