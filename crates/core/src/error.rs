//! Error types for dc-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for dc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for content-store operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid connection configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file to upload is missing or not a regular file
    #[error("File at path {} does not exist", .0.display())]
    MissingContent(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Remote resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error or unexpected response status
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed response from the store
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Checksum reported by the store does not match the local content
    #[error("Checksum mismatch: local content has {local}, store reported {remote}")]
    ChecksumMismatch { local: String, remote: String },

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    ///
    /// Exit code 1 is reserved for argument errors, which never reach this type.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Network(_) | Error::Protocol(_) => 3, // NetworkError
            Error::Auth(_) => 4,                         // AuthError
            Error::NotFound(_) => 5,                     // NotFound
            Error::Conflict(_) | Error::ChecksumMismatch { .. } => 6, // Conflict
            _ => 2,                                      // GeneralError
        }
    }
}
