//! Background downloads
//!
//! Each download gets its own tokio task and a [`FileTransfer`] handle the
//! caller can poll or await. There is no worker pool, no admission limit, no
//! cancellation and no deadline: a stalled store call stalls its task.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mb_core::{FileTransfer, GatewayError, Result, StoreGateway, TransferWriter};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::classify::classify;

/// Read buffer size for the copy loop
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Start copying `object_path` into `destination` in the background.
///
/// Returns immediately with a pending handle. Must be called inside a tokio
/// runtime.
pub fn start_download<G>(gateway: Arc<G>, object_path: String, destination: PathBuf) -> FileTransfer
where
    G: StoreGateway + ?Sized + 'static,
{
    let (handle, writer) = FileTransfer::pending();

    tokio::spawn(async move {
        match copy_to_file(gateway.as_ref(), &object_path, &destination, &writer).await {
            Ok(bytes) => {
                tracing::debug!(
                    path = %object_path,
                    destination = %destination.display(),
                    bytes,
                    "Download finished"
                );
                writer.complete_with_result(destination, bytes);
            }
            Err(err) => {
                tracing::error!(path = %object_path, error = %err, "Download failed");
                writer.fail(err);
            }
        }
    });

    handle
}

/// Copy the object and return the byte count to report.
///
/// The store's reported size wins over the counted bytes when it has one.
async fn copy_to_file<G>(
    gateway: &G,
    object_path: &str,
    destination: &Path,
    writer: &TransferWriter,
) -> Result<u64>
where
    G: StoreGateway + ?Sized,
{
    let object = gateway
        .get(object_path)
        .await
        .map_err(|e| classify(e, object_path))?;
    let expected = object.metadata.content_length;

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let mut file = tokio::fs::File::create(destination).await?;

    let mut body = object.body;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        let n = body
            .read(&mut buf)
            .await
            .map_err(|e| classify(GatewayError::Io(e), object_path))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).await?;
        copied += n as u64;
        writer.record_progress(copied, expected);
    }
    file.flush().await?;

    Ok(expected.unwrap_or(copied))
}
