use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fipack operations
pub type Result<T> = std::result::Result<T, FiasError>;

/// Unified error type for all fipack operations
#[derive(Debug, Error)]
pub enum FiasError {
    // Archive errors
    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    #[error("Invalid magic number in archive header")]
    InvalidMagic,

    #[error("File not found in archive: {0}")]
    FileNotFound(String),

    #[error("Buffer too small: entry needs {needed} bytes, buffer holds {got}")]
    BufferTooSmall { needed: u64, got: usize },

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    // Builder errors
    #[error("Cannot read source file {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid member path: {0}")]
    InvalidPath(String),

    #[error("Unsafe member path refused: {0}")]
    UnsafePath(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // Configuration and serialization errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for FiasError {
    fn from(err: toml::de::Error) -> Self {
        FiasError::Config(err.to_string())
    }
}
