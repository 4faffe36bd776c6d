//! ls command - List buckets and objects
//!
//! Lists the entries of a directory. Subdirectories show up as buckets,
//! files as objects.

use clap::Args;
use mb_core::{BlobStore as _, StorageEntry};
use serde::Serialize;

use super::{Store, fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List directory entries
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Remote directory (account:/login/stor/dir)
    pub path: String,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    items: Vec<StorageEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_buckets: usize,
    total_objects: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl Summary {
    fn of(items: &[StorageEntry]) -> Self {
        let total_size: u64 = items.iter().filter_map(|i| i.size_bytes).sum();
        Self {
            total_buckets: items.iter().filter(|i| i.is_bucket()).count(),
            total_objects: items.iter().filter(|i| !i.is_bucket()).count(),
            total_size_bytes: total_size,
            total_size_human: humansize::format_size(total_size, humansize::BINARY),
        }
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_target(&args.path, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let store = match open_store(&target.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let items = match collect(&store, &target.path, args.recursive).await {
        Ok(items) => items,
        Err(e) => return fail(&formatter, &format!("Failed to list '{}'", target.path), &e),
    };

    if formatter.is_json() {
        let summary = args.summarize.then(|| Summary::of(&items));
        formatter.json(&LsOutput { items, summary });
    } else {
        for item in &items {
            formatter.println(&format_entry(item));
        }

        if args.summarize {
            let summary = Summary::of(&items);
            formatter.println(&format!(
                "\nTotal: {} directories, {} objects, {}",
                summary.total_buckets, summary.total_objects, summary.total_size_human
            ));
        }
    }

    ExitCode::Success
}

/// List a directory, walking subdirectories breadth first when `recursive`
async fn collect(store: &Store, dir: &str, recursive: bool) -> mb_core::Result<Vec<StorageEntry>> {
    let mut items = store.list(Some(dir)).await?;
    if !recursive {
        return Ok(items);
    }

    let mut next = 0;
    while next < items.len() {
        if items[next].is_bucket() {
            let children = store.list(Some(&items[next].name)).await?;
            items.extend(children);
        }
        next += 1;
    }
    Ok(items)
}

fn format_entry(item: &StorageEntry) -> String {
    let date = item.created.strftime("%Y-%m-%d %H:%M:%S");
    if item.is_bucket() {
        format!("[{date}] {:>10} {}/", "DIR", item.name)
    } else {
        let size = item.size_human.as_deref().unwrap_or("0 B");
        format!("[{date}] {size:>10} {}", item.path())
    }
}
