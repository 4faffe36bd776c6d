//! StoreGateway trait definition
//!
//! The narrow capability interface a directory-oriented store client must
//! offer. Adapters depend only on this contract, never on a concrete client,
//! so the network client can be swapped or mocked freely.

use std::pin::Pin;

use async_trait::async_trait;
use jiff::Timestamp;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Content type the store reports for directories
pub const DIRECTORY_CONTENT_TYPE: &str = "application/x-json-stream; type=directory";

/// Byte stream flowing to or from the store
pub type ByteReader = Pin<Box<dyn AsyncRead + Send>>;

/// Result type alias for gateway calls
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Transport-level failures reported by a gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Store answered 403
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Store answered 404
    #[error("not found: {0}")]
    NotFound(String),

    /// Store refused to delete a directory that still has entries
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Any other HTTP status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection or local I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request could not be signed
    #[error("signing failed: {0}")]
    Signing(String),
}

impl GatewayError {
    /// Build an error from an HTTP status, using the dedicated variants where one exists
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            403 => GatewayError::Forbidden(message),
            404 => GatewayError::NotFound(message),
            _ => GatewayError::Status { status, message },
        }
    }

    /// HTTP status code when the failure carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Forbidden(_) => Some(403),
            GatewayError::NotFound(_) => Some(404),
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Kind of entry as reported by a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Object,
}

/// Metadata the store reports for a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Full path of the entry
    pub path: String,

    /// Content type header, if the store sent one
    pub content_type: Option<String>,

    /// Content length in bytes, if known
    pub content_length: Option<u64>,

    /// Kind taken from a listing; `None` when the metadata came from a bare probe
    pub kind: Option<EntryKind>,

    /// Last modification time
    pub last_modified: Option<Timestamp>,
}

impl EntryMetadata {
    /// Metadata for a directory as a listing reports it
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_type: Some(DIRECTORY_CONTENT_TYPE.to_string()),
            content_length: None,
            kind: Some(EntryKind::Directory),
            last_modified: None,
        }
    }

    /// Metadata for an object as a listing reports it
    pub fn object(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            content_type: None,
            content_length: Some(size),
            kind: Some(EntryKind::Object),
            last_modified: None,
        }
    }

    /// Whether the entry is marked as a directory.
    ///
    /// A listing-derived kind wins. Otherwise the directory content-type marker
    /// decides, and metadata from a bare probe may lack that marker.
    pub fn is_directory(&self) -> bool {
        match self.kind {
            Some(kind) => kind == EntryKind::Directory,
            None => self.content_type.as_deref() == Some(DIRECTORY_CONTENT_TYPE),
        }
    }
}

/// An object body together with its metadata
pub struct GetObject {
    pub metadata: EntryMetadata,
    pub body: ByteReader,
}

/// Capability interface of a directory-oriented remote store
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Probe metadata; `Ok(None)` when nothing exists at the path
    async fn head(&self, path: &str) -> GatewayResult<Option<EntryMetadata>>;

    /// List the immediate entries of a directory
    async fn list(&self, path: &str) -> GatewayResult<Vec<EntryMetadata>>;

    /// Create a directory; creating an existing directory is not an error
    async fn put_directory(&self, path: &str) -> GatewayResult<()>;

    /// Store an object from a byte stream
    async fn put_object(
        &self,
        path: &str,
        body: ByteReader,
        content_type: Option<String>,
    ) -> GatewayResult<()>;

    /// Delete an object or an empty directory
    async fn delete(&self, path: &str) -> GatewayResult<()>;

    /// Delete a directory together with everything below it
    async fn delete_recursive(&self, path: &str) -> GatewayResult<()>;

    /// Create a snap link at `new_path` referencing the content of `old_path`
    async fn create_link(&self, new_path: &str, old_path: &str) -> GatewayResult<()>;

    /// Open an object for reading
    async fn get(&self, path: &str) -> GatewayResult<GetObject>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            GatewayError::from_status(403, "denied"),
            GatewayError::Forbidden(_)
        ));
        assert!(matches!(
            GatewayError::from_status(404, "gone"),
            GatewayError::NotFound(_)
        ));
        let err = GatewayError::from_status(500, "boom");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn test_listing_kind_wins_over_content_type() {
        let mut meta = EntryMetadata::object("/jdoe/stor/a", 3);
        meta.content_type = Some(DIRECTORY_CONTENT_TYPE.to_string());
        assert!(!meta.is_directory());

        assert!(EntryMetadata::directory("/jdoe/stor/d").is_directory());
    }

    #[test]
    fn test_probe_metadata_uses_marker() {
        let mut meta = EntryMetadata {
            path: "/jdoe/stor/d".into(),
            content_type: Some(DIRECTORY_CONTENT_TYPE.into()),
            content_length: None,
            kind: None,
            last_modified: None,
        };
        assert!(meta.is_directory());

        meta.content_type = None;
        assert!(!meta.is_directory());
    }
}
