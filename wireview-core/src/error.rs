//! Error types for wireview

use thiserror::Error;

/// Main error type for wireview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("The file {path} can not be opened: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown file extension for the 3D model: {0}")]
    UnknownFormat(String),

    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Not initialized: {0}")]
    NotInitialized(String),

    #[error("Dimension mismatch: {cameras} camera poses for {objects} object poses")]
    DimensionMismatch { cameras: usize, objects: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O error together with the path that caused it
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type alias for wireview operations
pub type Result<T> = std::result::Result<T, Error>;
