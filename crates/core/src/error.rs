//! Error types for mb-core
//!
//! Provides the domain error taxonomy shared by every store adapter. Transport
//! failures are re-classified into these variants before reaching callers, and
//! each variant maps to an exit code for the CLI.

use thiserror::Error;

/// Result type alias for mb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mb-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Account profile not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account profile already exists
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// Local IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Nothing exists at the probed or listed path
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store refused the request
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Operation is impossible under the directory-based storage model
    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    /// Target exists but is not in the required state
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Generic transport or protocol failure
    #[error("Transport failure: {0}")]
    TransportFailure(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,                             // UsageError
            Error::Config(_) => 2,                                  // UsageError
            Error::TransportFailure(_) => 3,                        // NetworkError
            Error::NotAuthorized(_) => 4,                           // AuthError
            Error::NotFound(_) | Error::AccountNotFound(_) => 5,    // NotFound
            Error::PreconditionFailed(_) | Error::AccountExists(_) => 6, // Conflict
            Error::UnsupportedOperation(_) => 7,                    // UnsupportedFeature
            _ => 1,                                                 // GeneralError
        }
    }

    /// Whether this error reports a missing path
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::TransportFailure("test".into()).exit_code(), 3);
        assert_eq!(Error::NotAuthorized("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::AccountNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::PreconditionFailed("test".into()).exit_code(), 6);
        assert_eq!(Error::AccountExists("test".into()).exit_code(), 6);
        assert_eq!(Error::UnsupportedOperation("test".into()).exit_code(), 7);
        let io = std::io::Error::other("boom");
        assert_eq!(Error::Io(io).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::AccountNotFound("dev".into());
        assert_eq!(err.to_string(), "Account not found: dev");

        let err = Error::UnsupportedOperation("rename bucket".into());
        assert_eq!(err.to_string(), "Operation not supported: rename bucket");
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound("/jdoe/stor/x".into()).is_not_found());
        assert!(!Error::TransportFailure("reset".into()).is_not_found());
    }
}
