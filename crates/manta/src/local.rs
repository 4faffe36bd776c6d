//! Local directory gateway
//!
//! Serves a Manta-shaped tree from a directory on disk: `/<login>/stor/a/b`
//! lives at `<root>/<login>/stor/a/b`. Directories are directories, objects
//! are files and snap links are hard links. Like Manta, creating a directory
//! needs its parent to exist, and deleting a non-empty directory fails.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use mb_core::gateway::DIRECTORY_CONTENT_TYPE;
use mb_core::{
    ByteReader, EntryKind, EntryMetadata, GatewayError, GatewayResult, GetObject, StoreGateway,
};
use tokio::io::AsyncWriteExt;

/// Content type reported for objects, which carry no stored type locally
const OBJECT_CONTENT_TYPE: &str = "application/octet-stream";
const PARTIAL_SUFFIX: &str = ".partial";

/// A [`StoreGateway`] backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalGateway {
    root: PathBuf,
}

impl LocalGateway {
    /// Create a gateway serving the tree under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the `/<login>/stor` and `/<login>/public` directories
    pub async fn provision(&self, login: &str) -> GatewayResult<()> {
        for area in ["stor", "public"] {
            let dir = self.resolve(&format!("/{login}/{area}"))?;
            tokio::fs::create_dir_all(&dir).await?;
        }
        tracing::debug!(root = %self.root.display(), login, "Provisioned account directories");
        Ok(())
    }

    /// Map a store path onto the local tree, refusing `.` and `..` segments
    fn resolve(&self, path: &str) -> GatewayResult<PathBuf> {
        let mut local = self.root.clone();
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(segment) => local.push(segment),
                _ => {
                    return Err(GatewayError::from_status(
                        400,
                        format!("invalid path segment in '{path}'"),
                    ));
                }
            }
        }
        Ok(local)
    }

    async fn metadata(&self, path: &str, kind: Option<EntryKind>) -> GatewayResult<EntryMetadata> {
        let local = self.resolve(path)?;
        let meta = tokio::fs::metadata(&local)
            .await
            .map_err(|e| io_error(e, path))?;
        Ok(to_entry(path.to_string(), &meta, kind))
    }
}

fn to_entry(path: String, meta: &std::fs::Metadata, kind: Option<EntryKind>) -> EntryMetadata {
    let last_modified = meta
        .modified()
        .ok()
        .and_then(|t| Timestamp::try_from(t).ok());
    if meta.is_dir() {
        EntryMetadata {
            path,
            content_type: Some(DIRECTORY_CONTENT_TYPE.to_string()),
            content_length: None,
            kind,
            last_modified,
        }
    } else {
        EntryMetadata {
            path,
            content_type: Some(OBJECT_CONTENT_TYPE.to_string()),
            content_length: Some(meta.len()),
            kind,
            last_modified,
        }
    }
}

/// Translate a local I/O failure into the status the store would answer with
fn io_error(err: std::io::Error, path: &str) -> GatewayError {
    match err.kind() {
        std::io::ErrorKind::NotFound => GatewayError::NotFound(path.to_string()),
        std::io::ErrorKind::PermissionDenied => GatewayError::Forbidden(path.to_string()),
        std::io::ErrorKind::DirectoryNotEmpty => GatewayError::DirectoryNotEmpty(path.to_string()),
        _ => GatewayError::Io(err),
    }
}

/// Staging name for an object write in progress
fn partial_name(file_name: &str) -> String {
    format!(".{file_name}{PARTIAL_SUFFIX}")
}

fn is_partial(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

fn child_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

#[async_trait]
impl StoreGateway for LocalGateway {
    async fn head(&self, path: &str) -> GatewayResult<Option<EntryMetadata>> {
        match self.metadata(path, None).await {
            Ok(meta) => Ok(Some(meta)),
            Err(GatewayError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list(&self, path: &str) -> GatewayResult<Vec<EntryMetadata>> {
        let local = self.resolve(path)?;
        let mut reader = tokio::fs::read_dir(&local)
            .await
            .map_err(|e| io_error(e, path))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| io_error(e, path))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_partial(&name) {
                continue;
            }
            let meta = entry.metadata().await.map_err(|e| io_error(e, path))?;
            let kind = if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::Object
            };
            entries.push(to_entry(child_path(path, &name), &meta, Some(kind)));
        }

        // Manta lists in name order
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn put_directory(&self, path: &str) -> GatewayResult<()> {
        let local = self.resolve(path)?;
        match tokio::fs::create_dir(&local).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let meta = tokio::fs::metadata(&local)
                    .await
                    .map_err(|e| io_error(e, path))?;
                if meta.is_dir() {
                    Ok(())
                } else {
                    Err(GatewayError::from_status(
                        400,
                        format!("'{path}' exists and is an object"),
                    ))
                }
            }
            Err(e) => Err(io_error(e, path)),
        }
    }

    async fn put_object(
        &self,
        path: &str,
        mut body: ByteReader,
        _content_type: Option<String>,
    ) -> GatewayResult<()> {
        let local = self.resolve(path)?;
        let Some(file_name) = local.file_name() else {
            return Err(GatewayError::from_status(400, format!("'{path}' names no object")));
        };
        let partial = local.with_file_name(partial_name(&file_name.to_string_lossy()));

        let result = async {
            let mut file = tokio::fs::File::create(&partial).await?;
            tokio::io::copy(&mut body, &mut file).await?;
            file.flush().await?;
            tokio::fs::rename(&partial, &local).await
        }
        .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(io_error(e, path));
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> GatewayResult<()> {
        let local = self.resolve(path)?;
        let meta = tokio::fs::metadata(&local)
            .await
            .map_err(|e| io_error(e, path))?;
        let result = if meta.is_dir() {
            tokio::fs::remove_dir(&local).await
        } else {
            tokio::fs::remove_file(&local).await
        };
        result.map_err(|e| io_error(e, path))
    }

    async fn delete_recursive(&self, path: &str) -> GatewayResult<()> {
        let local = self.resolve(path)?;
        let meta = tokio::fs::metadata(&local)
            .await
            .map_err(|e| io_error(e, path))?;
        let result = if meta.is_dir() {
            tokio::fs::remove_dir_all(&local).await
        } else {
            tokio::fs::remove_file(&local).await
        };
        result.map_err(|e| io_error(e, path))
    }

    async fn create_link(&self, new_path: &str, old_path: &str) -> GatewayResult<()> {
        let source = self.resolve(old_path)?;
        let target = self.resolve(new_path)?;

        let meta = tokio::fs::metadata(&source)
            .await
            .map_err(|e| io_error(e, old_path))?;
        if meta.is_dir() {
            return Err(GatewayError::from_status(
                400,
                format!("cannot link directory '{old_path}'"),
            ));
        }

        // A snap link replaces whatever object held the name before
        if let Ok(existing) = tokio::fs::metadata(&target).await {
            if existing.is_dir() {
                return Err(GatewayError::from_status(
                    400,
                    format!("'{new_path}' is a directory"),
                ));
            }
            tokio::fs::remove_file(&target)
                .await
                .map_err(|e| io_error(e, new_path))?;
        }

        tokio::fs::hard_link(&source, &target)
            .await
            .map_err(|e| io_error(e, new_path))
    }

    async fn get(&self, path: &str) -> GatewayResult<GetObject> {
        let metadata = self.metadata(path, Some(EntryKind::Object)).await?;
        if metadata.content_length.is_none() {
            return Err(GatewayError::from_status(
                400,
                format!("'{path}' is a directory"),
            ));
        }
        let local = self.resolve(path)?;
        let file = tokio::fs::File::open(&local)
            .await
            .map_err(|e| io_error(e, path))?;
        Ok(GetObject {
            metadata,
            body: Box::pin(file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    async fn provisioned() -> (LocalGateway, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let gateway = LocalGateway::new(temp_dir.path());
        gateway.provision("jdoe").await.unwrap();
        (gateway, temp_dir)
    }

    fn body(data: &'static [u8]) -> ByteReader {
        Box::pin(data)
    }

    #[tokio::test]
    async fn test_head_missing_is_none() {
        let (gateway, _temp_dir) = provisioned().await;
        assert!(gateway.head("/jdoe/stor/nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_head_directory_has_marker() {
        let (gateway, _temp_dir) = provisioned().await;
        let meta = gateway.head("/jdoe/stor").await.unwrap().unwrap();
        assert!(meta.is_directory());
        assert!(meta.kind.is_none());
    }

    #[tokio::test]
    async fn test_put_directory_needs_parent() {
        let (gateway, _temp_dir) = provisioned().await;
        let err = gateway.put_directory("/jdoe/stor/a/b").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));

        gateway.put_directory("/jdoe/stor/a").await.unwrap();
        gateway.put_directory("/jdoe/stor/a").await.unwrap();
        gateway.put_directory("/jdoe/stor/a/b").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_and_get_object() {
        let (gateway, _temp_dir) = provisioned().await;
        gateway
            .put_object("/jdoe/stor/hello.txt", body(b"hello"), None)
            .await
            .unwrap();

        let object = gateway.get("/jdoe/stor/hello.txt").await.unwrap();
        assert_eq!(object.metadata.content_length, Some(5));

        let mut content = String::new();
        let mut reader = object.body;
        reader.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_typed() {
        let (gateway, _temp_dir) = provisioned().await;
        gateway.put_directory("/jdoe/stor/b").await.unwrap();
        gateway
            .put_object("/jdoe/stor/a.txt", body(b"abc"), None)
            .await
            .unwrap();

        let entries = gateway.list("/jdoe/stor/").await.unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/jdoe/stor/a.txt", "/jdoe/stor/b"]);
        assert_eq!(entries[0].kind, Some(EntryKind::Object));
        assert_eq!(entries[0].content_length, Some(3));
        assert_eq!(entries[1].kind, Some(EntryKind::Directory));
    }

    #[tokio::test]
    async fn test_list_skips_uploads_in_progress() {
        let (gateway, temp_dir) = provisioned().await;
        gateway
            .put_object("/jdoe/stor/a.txt", body(b"abc"), None)
            .await
            .unwrap();
        std::fs::write(temp_dir.path().join("jdoe/stor/.b.bin.partial"), b"half").unwrap();

        let entries = gateway.list("/jdoe/stor").await.unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/jdoe/stor/a.txt"]);
        assert!(is_partial(&partial_name("b.bin")));
        assert!(!is_partial("b.partial"));
    }

    #[tokio::test]
    async fn test_delete_non_empty_directory_fails() {
        let (gateway, _temp_dir) = provisioned().await;
        gateway.put_directory("/jdoe/stor/d").await.unwrap();
        gateway
            .put_object("/jdoe/stor/d/x", body(b"x"), None)
            .await
            .unwrap();

        let err = gateway.delete("/jdoe/stor/d").await.unwrap_err();
        assert!(crate::classify::is_directory_not_empty(&err));

        gateway.delete_recursive("/jdoe/stor/d").await.unwrap();
        assert!(gateway.head("/jdoe/stor/d").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_link_replaces_target() {
        let (gateway, _temp_dir) = provisioned().await;
        gateway
            .put_object("/jdoe/stor/old", body(b"new content"), None)
            .await
            .unwrap();
        gateway
            .put_object("/jdoe/stor/new", body(b"stale"), None)
            .await
            .unwrap();

        gateway
            .create_link("/jdoe/stor/new", "/jdoe/stor/old")
            .await
            .unwrap();

        let meta = gateway.head("/jdoe/stor/new").await.unwrap().unwrap();
        assert_eq!(meta.content_length, Some(11));
    }

    #[tokio::test]
    async fn test_dot_dot_rejected() {
        let (gateway, _temp_dir) = provisioned().await;
        let err = gateway.head("/jdoe/../../etc").await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
}
