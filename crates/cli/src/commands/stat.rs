//! stat command - Show object metadata
//!
//! Displays what the store reports for a directory or an object.

use clap::Args;
use mb_core::{BlobStore as _, Error, StorageEntry};
use serde::Serialize;

use super::{Store, fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Remote path (account:/login/stor/dir/object)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    #[serde(rename = "type")]
    kind: &'static str,
    path: String,
    #[serde(flatten)]
    entry: StorageEntry,
    public: bool,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_target(&args.path, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let store = match open_store(&target.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let entry = match describe(&store, &target.path).await {
        Ok(entry) => entry,
        Err(e) => return fail(&formatter, &format!("Cannot stat '{}'", target.path), &e),
    };

    let public = if entry.is_bucket() {
        store.is_public(Some(&entry.name), None)
    } else {
        store.is_public(Some(&entry.container), Some(&entry.name))
    };
    let output = StatOutput {
        kind: if entry.is_bucket() { "directory" } else { "object" },
        path: entry.path(),
        entry,
        public,
    };

    if formatter.is_json() {
        formatter.json(&output);
    } else {
        formatter.println(&format!("Name      : {}", output.path));
        formatter.println(&format!("Type      : {}", output.kind));
        if let (Some(bytes), Some(human)) = (output.entry.size_bytes, &output.entry.size_human) {
            formatter.println(&format!("Size      : {human} ({bytes} bytes)"));
        }
        formatter.println(&format!(
            "Modified  : {}",
            output.entry.created.strftime("%Y-%m-%d %H:%M:%S UTC")
        ));
        formatter.println(&format!("Region    : {}", output.entry.region_id));
        formatter.println(&format!("Public    : {}", output.public));
    }

    ExitCode::Success
}

/// Directory entry when the path is a directory, object entry otherwise
async fn describe(store: &Store, path: &str) -> mb_core::Result<StorageEntry> {
    match store.get_bucket(path).await {
        Ok(entry) => Ok(entry),
        Err(Error::PreconditionFailed(_)) => {
            let container = mb_core::container_of(path);
            let name = mb_core::leaf_of(path);
            store
                .get_object(Some(container), Some(name))
                .await?
                .ok_or_else(|| Error::NotFound(path.to_string()))
        }
        Err(e) => Err(e),
    }
}
