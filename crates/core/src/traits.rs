//! BlobStore trait definition
//!
//! This trait is the flat bucket/object contract callers program against.
//! Store adapters implement it on top of whatever model their backend has.

use std::path::Path;

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transfer::FileTransfer;

/// Normalized description of a bucket or an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    /// Region the entry lives in
    pub region_id: String,

    /// Container path; empty for buckets, which are named by their full path
    pub container: String,

    /// Bucket path or object name
    pub name: String,

    /// Creation or observation time
    pub created: Timestamp,

    /// Size in bytes (None for buckets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,
}

impl StorageEntry {
    /// Create an entry for a bucket (directory), stamped now
    pub fn bucket(region_id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            container: String::new(),
            name: path.into(),
            created: Timestamp::now(),
            size_bytes: None,
            size_human: None,
        }
    }

    /// Create an entry for an object (file), stamped now
    pub fn object(
        region_id: impl Into<String>,
        container: impl Into<String>,
        name: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            region_id: region_id.into(),
            container: container.into(),
            name: name.into(),
            created: Timestamp::now(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size, humansize::BINARY)),
        }
    }

    /// Whether this entry describes a bucket
    pub fn is_bucket(&self) -> bool {
        self.size_bytes.is_none()
    }

    /// Full path of the entry
    pub fn path(&self) -> String {
        format!("{}{}", self.container, self.name)
    }
}

/// Rules a bucket or object name must follow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameRules {
    pub min_chars: u32,
    pub max_chars: u32,
    pub allow_alpha: bool,
    pub allow_numbers: bool,
    /// Names differing only in case are the same name
    pub case_insensitive: bool,
    /// Special characters that may not appear in a name
    pub denied_chars: Vec<char>,
}

impl NameRules {
    /// Check a candidate name against the rules
    pub fn permits(&self, name: &str) -> bool {
        let len = name.chars().count();
        if len < self.min_chars as usize || len > self.max_chars as usize {
            return false;
        }
        name.chars().all(|c| {
            if self.denied_chars.contains(&c) {
                false
            } else if c.is_alphabetic() {
                self.allow_alpha
            } else if c.is_numeric() {
                self.allow_numbers
            } else {
                true
            }
        })
    }
}

/// Backend capability information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Buckets may contain buckets
    pub allows_nested_buckets: bool,

    /// Objects may live outside any bucket
    pub allows_root_objects: bool,

    /// Content can be shared publicly
    pub allows_public_sharing: bool,

    /// Maximum number of buckets
    pub max_buckets: u32,

    /// Maximum object size in bytes
    pub max_object_size: u64,

    /// Maximum number of objects in one bucket
    pub max_objects_per_bucket: u32,

    /// What the provider calls a bucket
    pub bucket_term: &'static str,

    /// What the provider calls an object
    pub object_term: &'static str,
}

/// Flat bucket/object storage contract
///
/// Implemented by store adapters; callers never see transport errors, only
/// the domain errors from [`crate::Error`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Static capability flags and limits
    fn capabilities(&self) -> Capabilities;

    /// Naming rules for buckets
    fn bucket_name_rules(&self) -> NameRules;

    /// Naming rules for objects
    fn object_name_rules(&self) -> NameRules;

    /// What the provider calls a bucket
    fn provider_term_for_bucket(&self) -> &'static str {
        self.capabilities().bucket_term
    }

    /// What the provider calls an object
    fn provider_term_for_object(&self) -> &'static str {
        self.capabilities().object_term
    }

    /// Create a bucket. Alternate-name generation may be unsupported.
    async fn create_bucket(&self, bucket: &str, find_free_name: bool) -> Result<StorageEntry>;

    /// Check whether a bucket exists
    async fn exists(&self, bucket: &str) -> Result<bool>;

    /// Get a bucket, failing if the path is not a bucket
    async fn get_bucket(&self, bucket: &str) -> Result<StorageEntry>;

    /// Get an object; `None` when no name is given
    async fn get_object(
        &self,
        bucket: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<StorageEntry>>;

    /// Get an object's size; `None` when no name is given
    async fn get_object_size(&self, bucket: Option<&str>, name: Option<&str>)
    -> Result<Option<u64>>;

    /// List the entries of a bucket
    async fn list(&self, bucket: Option<&str>) -> Result<Vec<StorageEntry>>;

    /// Delete everything in a bucket, keeping the bucket
    async fn clear_bucket(&self, bucket: &str) -> Result<()>;

    /// Delete a bucket and its contents
    async fn remove_bucket(&self, bucket: &str) -> Result<()>;

    /// Delete an object
    async fn remove_object(&self, bucket: Option<&str>, name: &str) -> Result<()>;

    /// Rename a bucket
    async fn rename_bucket(&self, old: &str, new: &str, find_free_name: bool) -> Result<String>;

    /// Rename an object within a bucket
    async fn rename_object(&self, bucket: Option<&str>, old: &str, new: &str) -> Result<()>;

    /// Move an object to another bucket
    async fn move_object(
        &self,
        from_bucket: Option<&str>,
        name: Option<&str>,
        to_bucket: Option<&str>,
    ) -> Result<()>;

    /// Make a bucket publicly readable
    async fn make_bucket_public(&self, bucket: &str) -> Result<()>;

    /// Make an object publicly readable
    async fn make_object_public(&self, bucket: Option<&str>, name: &str) -> Result<()>;

    /// Whether a bucket or object is publicly readable
    fn is_public(&self, bucket: Option<&str>, name: Option<&str>) -> bool;

    /// Whether the account can use the store at all
    async fn is_subscribed(&self) -> Result<bool>;

    /// Upload a local file as an object
    async fn upload(&self, source: &Path, bucket: Option<&str>, name: &str)
    -> Result<StorageEntry>;

    /// Start downloading an object in the background
    async fn download(
        &self,
        bucket: Option<&str>,
        name: &str,
        destination: &Path,
    ) -> Result<FileTransfer>;
}
