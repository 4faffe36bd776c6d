//! Background transfer handles
//!
//! A [`FileTransfer`] is what a caller holds while a download runs in the
//! background. The matching [`TransferWriter`] belongs to the single worker
//! doing the copy. Every write goes through the handle's own lock, and the
//! writer is consumed when it records a terminal state, so a finished
//! transfer can never change again.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use jiff::Timestamp;
use tokio::sync::watch;

use crate::error::Error;

/// Terminal or pending state of a transfer
#[derive(Debug, Clone)]
pub enum TransferStatus {
    /// Still running
    Pending,
    /// Finished; carries the destination file
    Succeeded(PathBuf),
    /// Gave up; carries the classified error
    Failed(Arc<Error>),
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferStatus::Pending)
    }
}

/// Point-in-time view of a transfer
#[derive(Debug, Clone)]
pub struct TransferProgress {
    pub start_time: Timestamp,
    /// 0 to 100
    pub percent_complete: u8,
    /// Bytes still expected
    pub bytes_to_transfer: u64,
    pub bytes_transferred: u64,
    pub status: TransferStatus,
}

impl TransferProgress {
    fn pending() -> Self {
        Self {
            start_time: Timestamp::now(),
            percent_complete: 0,
            bytes_to_transfer: 0,
            bytes_transferred: 0,
            status: TransferStatus::Pending,
        }
    }
}

fn lock(state: &Mutex<TransferProgress>) -> MutexGuard<'_, TransferProgress> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Caller side of a background transfer (read-only)
#[derive(Debug, Clone)]
pub struct FileTransfer {
    state: Arc<Mutex<TransferProgress>>,
    done: watch::Receiver<bool>,
}

impl FileTransfer {
    /// Create a pending transfer and the writer its worker will own
    pub fn pending() -> (FileTransfer, TransferWriter) {
        let state = Arc::new(Mutex::new(TransferProgress::pending()));
        let (tx, rx) = watch::channel(false);
        let handle = FileTransfer {
            state: Arc::clone(&state),
            done: rx,
        };
        let writer = TransferWriter {
            state,
            done: tx,
            finished: false,
        };
        (handle, writer)
    }

    /// Consistent copy of every field
    pub fn snapshot(&self) -> TransferProgress {
        lock(&self.state).clone()
    }

    pub fn start_time(&self) -> Timestamp {
        lock(&self.state).start_time
    }

    pub fn percent_complete(&self) -> u8 {
        lock(&self.state).percent_complete
    }

    pub fn bytes_to_transfer(&self) -> u64 {
        lock(&self.state).bytes_to_transfer
    }

    pub fn bytes_transferred(&self) -> u64 {
        lock(&self.state).bytes_transferred
    }

    pub fn status(&self) -> TransferStatus {
        lock(&self.state).status.clone()
    }

    /// Whether the transfer reached a terminal state
    pub fn is_complete(&self) -> bool {
        lock(&self.state).status.is_terminal()
    }

    /// Wait for the terminal state and return the final view
    pub async fn wait(&self) -> TransferProgress {
        let mut done = self.done.clone();
        // The writer always publishes before it goes away, so an error here
        // still leaves a terminal state behind.
        let _ = done.wait_for(|finished| *finished).await;
        self.snapshot()
    }
}

/// Worker side of a background transfer; the only writer
#[derive(Debug)]
pub struct TransferWriter {
    state: Arc<Mutex<TransferProgress>>,
    done: watch::Sender<bool>,
    finished: bool,
}

impl TransferWriter {
    /// Record intermediate progress. `total` is the expected size, if known.
    pub fn record_progress(&self, transferred: u64, total: Option<u64>) {
        let mut state = lock(&self.state);
        state.bytes_transferred = transferred;
        if let Some(total) = total {
            state.bytes_to_transfer = total.saturating_sub(transferred);
            if total > 0 {
                // 100 is reserved for the terminal state
                let done = u128::from(transferred.min(total));
                let percent = (done * 100 / u128::from(total)).min(99);
                state.percent_complete = percent as u8;
            }
        }
    }

    /// Mark the transfer as succeeded
    pub fn complete_with_result(mut self, destination: PathBuf, bytes_transferred: u64) {
        {
            let mut state = lock(&self.state);
            state.percent_complete = 100;
            state.bytes_to_transfer = 0;
            state.bytes_transferred = bytes_transferred;
            state.status = TransferStatus::Succeeded(destination);
        }
        self.publish();
    }

    /// Mark the transfer as failed
    pub fn fail(mut self, error: Error) {
        lock(&self.state).status = TransferStatus::Failed(Arc::new(error));
        self.publish();
    }

    fn publish(&mut self) {
        self.finished = true;
        self.done.send_replace(true);
    }
}

impl Drop for TransferWriter {
    fn drop(&mut self) {
        if !self.finished {
            lock(&self.state).status = TransferStatus::Failed(Arc::new(Error::TransportFailure(
                "transfer worker stopped before completing".into(),
            )));
            self.publish();
        }
    }
}
