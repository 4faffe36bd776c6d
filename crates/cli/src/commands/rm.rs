//! rm command - Remove objects
//!
//! Deletes one or more objects. Directories are removed with `rb`.

use clap::Args;
use mb_core::BlobStore as _;
use serde::Serialize;

use super::{fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove objects
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Object paths (account:/login/stor/dir/object)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Ignore objects that do not exist
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    deleted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let mut targets = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        match parse_target(path, &formatter) {
            Ok(t) if t.is_dir() => {
                formatter.error(&format!("'{t}' is a directory; use rb"));
                return ExitCode::UsageError;
            }
            Ok(t) => targets.push(t),
            Err(code) => return code,
        }
    }

    let mut output = RmOutput {
        deleted: Vec::new(),
        missing: Vec::new(),
    };

    for target in targets {
        let store = match open_store(&target.account, &formatter) {
            Ok(s) => s,
            Err(code) => return code,
        };

        match store.remove_object(None, &target.path).await {
            Ok(()) => {
                formatter.success(&format!("Removed '{target}'."));
                output.deleted.push(target.to_string());
            }
            Err(e) if e.is_not_found() && args.force => {
                output.missing.push(target.to_string());
            }
            Err(e) => return fail(&formatter, &format!("Failed to remove '{target}'"), &e),
        }
    }

    if formatter.is_json() {
        formatter.json(&output);
    }
    ExitCode::Success
}
