use thiserror::Error;

/// Common errors of the Jacs libraries
#[derive(Error, Debug)]
pub enum Error {
    /// Bytecode or text could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Filesystem or stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON (debug info, configuration)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a host implementation
    #[error("Host error: {0}")]
    Host(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Result type used across the workspace
pub type Result<T> = std::result::Result<T, Error>;
