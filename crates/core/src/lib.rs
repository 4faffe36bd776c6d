//! mb-core: Core library for the mbs blob store adapter
//!
//! This crate provides the pieces shared by every adapter and the CLI:
//! - The `BlobStore` contract callers program against
//! - The `StoreGateway` contract a directory store client must offer
//! - Path splitting for `/<login>/<stor|public>/...` paths
//! - Background transfer handles
//! - Configuration and account management
//!
//! It does not depend on any particular store client.

pub mod account;
pub mod config;
pub mod error;
pub mod gateway;
pub mod path;
pub mod traits;
pub mod transfer;

pub use account::{Account, AccountManager};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use gateway::{
    ByteReader, EntryKind, EntryMetadata, GatewayError, GatewayResult, GetObject, StoreGateway,
};
pub use path::{
    ParsedPath, RemotePath, container_of, directory_path, leaf_of, parse_path, parse_remote_path,
};
pub use traits::{BlobStore, Capabilities, NameRules, StorageEntry};
pub use transfer::{FileTransfer, TransferProgress, TransferStatus, TransferWriter};
