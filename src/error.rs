//! Error types for Marga

use thiserror::Error;

use crate::cspace::CacheError;

/// Marga error type
#[derive(Error, Debug)]
pub enum MargaError {
    /// File or stream I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid grid geometry or map contents
    #[error("Map error: {0}")]
    Map(String),

    /// Configuration-space cache failure
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

/// Result alias for fallible Marga operations
pub type Result<T> = std::result::Result<T, MargaError>;
