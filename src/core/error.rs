//! Error types for the voxseg crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A ray was built from a zero-length (or non-finite) direction vector.
    #[error("ray direction is degenerate (zero length or non-finite)")]
    RayDirectionDegenerate,

    #[error("invalid coordinate key: {0}")]
    InvalidCoordinateKey(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
