//! mb-manta: Manta adapter for the mbs blob store contract
//!
//! [`MantaStore`] implements `BlobStore` on top of any `StoreGateway`.
//! [`LocalGateway`] serves a Manta-shaped tree from the local filesystem,
//! which is what `file://` accounts use.

pub mod capability;
pub mod classify;
pub mod download;
pub mod local;
pub mod store;

pub use local::LocalGateway;
pub use store::MantaStore;
