//! get command - Download an object
//!
//! Starts a background download and follows its progress until it reaches
//! a terminal state.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use mb_core::{BlobStore as _, TransferStatus, container_of, leaf_of};
use serde::Serialize;

use super::{fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Interval between progress bar refreshes
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Download an object
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Remote object (account:/login/stor/dir/object)
    pub source: String,

    /// Local destination; a directory receives the object under its own name
    pub destination: PathBuf,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    source: String,
    destination: String,
    size_bytes: u64,
    size_human: String,
    started: String,
}

/// Execute the get command
pub async fn execute(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let source = match parse_target(&args.source, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };
    if source.is_dir() {
        formatter.error(&format!("'{source}' names a directory, not an object"));
        return ExitCode::UsageError;
    }

    let store = match open_store(&source.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let total = match store
        .get_object_size(Some(container_of(&source.path)), Some(leaf_of(&source.path)))
        .await
    {
        Ok(size) => size.unwrap_or(0),
        Err(e) => return fail(&formatter, &format!("Cannot read '{}'", source.path), &e),
    };

    let destination = if args.destination.is_dir() {
        args.destination.join(leaf_of(&source.path))
    } else {
        args.destination.clone()
    };

    let transfer = match store.download(None, &source.path, &destination).await {
        Ok(t) => t,
        Err(e) => return fail(&formatter, "Download failed", &e),
    };

    let bar = ProgressBar::new(formatter.config(), total);
    let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
    let progress = loop {
        tokio::select! {
            progress = transfer.wait() => break progress,
            _ = ticker.tick() => bar.set_position(transfer.bytes_transferred()),
        }
    };
    bar.finish_and_clear();

    match progress.status {
        TransferStatus::Succeeded(path) => {
            let size_human = humansize::format_size(progress.bytes_transferred, humansize::BINARY);
            if formatter.is_json() {
                formatter.json(&GetOutput {
                    status: "success",
                    source: source.to_string(),
                    destination: path.display().to_string(),
                    size_bytes: progress.bytes_transferred,
                    size_human,
                    started: progress.start_time.to_string(),
                });
            } else {
                formatter.success(&format!("{source} -> {} ({size_human})", path.display()));
            }
            ExitCode::Success
        }
        TransferStatus::Failed(e) => fail(&formatter, "Download failed", e.as_ref()),
        TransferStatus::Pending => {
            formatter.error("Download stopped without a result");
            ExitCode::GeneralError
        }
    }
}
