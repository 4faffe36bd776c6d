//! Manta blob store
//!
//! Maps the flat bucket/object contract onto Manta's directory tree. Buckets
//! are directories, objects are files, and public visibility is a matter of
//! living under `/<login>/public`. Every gateway failure is re-classified
//! before it leaves this module.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mb_core::path::{self, private_root, public_root};
use mb_core::{
    Account, BlobStore, ByteReader, Capabilities, EntryMetadata, Error, FileTransfer, NameRules,
    Result, StorageEntry, StoreGateway,
};

use crate::capability;
use crate::classify::{classify, is_directory_not_empty, subscription_outcome};
use crate::download::start_download;

/// Blob store adapter over a Manta-style directory store
pub struct MantaStore<G: ?Sized> {
    gateway: Arc<G>,
    login: String,
    region_id: String,
}

impl<G> MantaStore<G>
where
    G: StoreGateway + ?Sized + 'static,
{
    /// Create a store for `login`, reporting `region_id` on every entry
    pub fn new(gateway: Arc<G>, login: impl Into<String>, region_id: impl Into<String>) -> Self {
        Self {
            gateway,
            login: login.into(),
            region_id: region_id.into(),
        }
    }

    /// Create a store from an account profile
    pub fn for_account(gateway: Arc<G>, account: &Account) -> Self {
        Self::new(gateway, account.login.clone(), account.region.clone())
    }

    /// The underlying gateway
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// Directory for objects addressed without a bucket: `/<login>/stor/`
    pub fn private_root(&self) -> String {
        private_root(&self.login)
    }

    /// Full path of an object, falling back to the private root
    fn object_path(&self, bucket: Option<&str>, name: &str) -> String {
        match bucket {
            Some(bucket) => format!("{bucket}{name}"),
            None => format!("{}{name}", self.private_root()),
        }
    }

    async fn probe(&self, path: &str) -> Result<EntryMetadata> {
        tracing::debug!(path, "Probing metadata");
        self.gateway
            .head(path)
            .await
            .map_err(|e| classify(e, path))?
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    /// Delete a directory, falling back to a recursive delete when it has entries
    async fn delete_directory(&self, dir: &str) -> Result<()> {
        tracing::debug!(path = dir, "Deleting directory");
        match self.gateway.delete(dir).await {
            Ok(()) => Ok(()),
            Err(err) if is_directory_not_empty(&err) => {
                tracing::debug!(path = dir, error = %err, "Directory is not empty. Delete recursively.");
                self.gateway
                    .delete_recursive(dir)
                    .await
                    .map_err(|e| classify(e, dir))
            }
            Err(err) => Err(classify(err, dir)),
        }
    }

    async fn put_directory(&self, dir: &str) -> Result<()> {
        tracing::debug!(path = dir, "Creating directory");
        self.gateway
            .put_directory(dir)
            .await
            .map_err(|e| classify(e, dir))
    }

    /// Entry for a listed child; an object the store reported no size for is rejected
    fn to_entry(&self, meta: &EntryMetadata) -> Result<StorageEntry> {
        if meta.is_directory() {
            let mut entry = StorageEntry::bucket(&self.region_id, &meta.path);
            if let Some(modified) = meta.last_modified {
                entry.created = modified;
            }
            Ok(entry)
        } else {
            self.object_entry(meta)
        }
    }

    fn object_entry(&self, meta: &EntryMetadata) -> Result<StorageEntry> {
        let mut entry = StorageEntry::object(
            &self.region_id,
            path::container_of(&meta.path),
            path::leaf_of(&meta.path),
            object_size(meta)?,
        );
        if let Some(modified) = meta.last_modified {
            entry.created = modified;
        }
        Ok(entry)
    }
}

#[async_trait]
impl<G> BlobStore for MantaStore<G>
where
    G: StoreGateway + ?Sized + 'static,
{
    fn capabilities(&self) -> Capabilities {
        capability::capabilities()
    }

    fn bucket_name_rules(&self) -> NameRules {
        capability::name_rules()
    }

    fn object_name_rules(&self) -> NameRules {
        capability::name_rules()
    }

    /// `find_free_name` is ignored: no alternate name is ever generated.
    async fn create_bucket(&self, bucket: &str, _find_free_name: bool) -> Result<StorageEntry> {
        self.put_directory(bucket).await?;
        Ok(StorageEntry::bucket(&self.region_id, bucket))
    }

    async fn exists(&self, bucket: &str) -> Result<bool> {
        match self.probe(bucket).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The directory marker may only be reliable after the parent directory
    /// has been listed; a bare probe without it is reported as not a bucket.
    async fn get_bucket(&self, bucket: &str) -> Result<StorageEntry> {
        let meta = self.probe(bucket).await?;
        if meta.is_directory() {
            Ok(StorageEntry::bucket(&self.region_id, bucket))
        } else {
            Err(Error::PreconditionFailed(format!(
                "Bucket \"{bucket}\" is not a directory"
            )))
        }
    }

    async fn get_object(
        &self,
        bucket: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<StorageEntry>> {
        let Some(name) = name else {
            return Ok(None);
        };
        let object_path = self.object_path(bucket, name);
        let meta = self.probe(&object_path).await?;
        ensure_object(&meta)?;
        self.object_entry(&meta).map(Some)
    }

    async fn get_object_size(
        &self,
        bucket: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<u64>> {
        let Some(name) = name else {
            return Ok(None);
        };
        let object_path = self.object_path(bucket, name);
        let meta = self.probe(&object_path).await?;
        ensure_object(&meta)?;
        object_size(&meta).map(Some)
    }

    async fn list(&self, bucket: Option<&str>) -> Result<Vec<StorageEntry>> {
        let Some(bucket) = bucket else {
            return Err(Error::UnsupportedOperation(
                "Bucket is a directory in Manta and it cannot be null".into(),
            ));
        };
        tracing::debug!(path = bucket, "Listing directory");
        let entries = self
            .gateway
            .list(bucket)
            .await
            .map_err(|e| classify(e, bucket))?;
        entries.iter().map(|meta| self.to_entry(meta)).collect()
    }

    async fn clear_bucket(&self, bucket: &str) -> Result<()> {
        let dir = path::directory_path(bucket);
        self.delete_directory(dir).await?;
        self.put_directory(dir).await
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        self.delete_directory(path::directory_path(bucket)).await
    }

    /// `bucket` is ignored; `name` is the full object path.
    async fn remove_object(&self, _bucket: Option<&str>, name: &str) -> Result<()> {
        tracing::debug!(path = name, "Deleting object");
        self.gateway.delete(name).await.map_err(|e| classify(e, name))
    }

    async fn rename_bucket(&self, _old: &str, _new: &str, _find_free_name: bool) -> Result<String> {
        Err(Error::UnsupportedOperation(
            "Manta directories cannot be renamed through this store".into(),
        ))
    }

    /// Not atomic: if the delete fails after the link was made, both names
    /// resolve to the same content.
    async fn rename_object(&self, _bucket: Option<&str>, old: &str, new: &str) -> Result<()> {
        tracing::debug!(from = old, to = new, "Renaming object");
        self.gateway
            .create_link(new, old)
            .await
            .map_err(|e| classify(e, old))?;

        if let Err(err) = self.gateway.delete(old).await {
            tracing::warn!(from = old, to = new, error = %err, "Link created but source not deleted");
            return Err(classify(err, old));
        }
        Ok(())
    }

    async fn move_object(
        &self,
        _from_bucket: Option<&str>,
        _name: Option<&str>,
        _to_bucket: Option<&str>,
    ) -> Result<()> {
        Err(Error::UnsupportedOperation(
            "Manta does not have support of buckets".into(),
        ))
    }

    async fn make_bucket_public(&self, _bucket: &str) -> Result<()> {
        Err(Error::UnsupportedOperation(format!(
            "Visibility follows location; store content under {} instead",
            public_root(&self.login)
        )))
    }

    async fn make_object_public(&self, _bucket: Option<&str>, _name: &str) -> Result<()> {
        Err(Error::UnsupportedOperation(format!(
            "Visibility follows location; store content under {} instead",
            public_root(&self.login)
        )))
    }

    /// `name` is ignored: visibility is decided per directory.
    fn is_public(&self, bucket: Option<&str>, _name: Option<&str>) -> bool {
        match bucket {
            Some(bucket) => bucket.starts_with(&public_root(&self.login)),
            None => false,
        }
    }

    async fn is_subscribed(&self) -> Result<bool> {
        let root = directory_root(&self.login);
        subscription_outcome(self.gateway.list(&root).await, &root)
    }

    /// No cleanup happens when the put fails; the store only materializes
    /// objects whose put completed.
    async fn upload(
        &self,
        source: &Path,
        bucket: Option<&str>,
        name: &str,
    ) -> Result<StorageEntry> {
        let container = match bucket {
            Some(bucket) => bucket.to_string(),
            None => self.private_root(),
        };
        self.put_directory(&container).await?;

        let file = tokio::fs::File::open(source).await?;
        let size = file.metadata().await?.len();
        let content_type = mime_guess::from_path(name)
            .first()
            .map(|m| m.essence_str().to_string());

        let object_path = format!("{container}{name}");
        tracing::debug!(
            source = %source.display(),
            path = %object_path,
            size,
            "Uploading object"
        );
        let body: ByteReader = Box::pin(file);
        self.gateway
            .put_object(&object_path, body, content_type)
            .await
            .map_err(|e| classify(e, &object_path))?;

        Ok(StorageEntry::object(&self.region_id, container, name, size))
    }

    /// `bucket` is ignored; `name` is the full object path.
    async fn download(
        &self,
        _bucket: Option<&str>,
        name: &str,
        destination: &Path,
    ) -> Result<FileTransfer> {
        Ok(start_download(
            Arc::clone(&self.gateway),
            name.to_string(),
            destination.to_path_buf(),
        ))
    }
}

fn ensure_object(meta: &EntryMetadata) -> Result<()> {
    if meta.is_directory() {
        return Err(Error::PreconditionFailed(format!(
            "\"{}\" is a directory, not an object",
            meta.path
        )));
    }
    Ok(())
}

fn object_size(meta: &EntryMetadata) -> Result<u64> {
    meta.content_length.ok_or_else(|| {
        Error::TransportFailure(format!("Store reported no size for \"{}\"", meta.path))
    })
}

/// Directory listed by the subscription probe: `/<login>/stor`
fn directory_root(login: &str) -> String {
    path::directory_path(&private_root(login)).to_string()
}
