//! clear command - Empty a bucket
//!
//! Deletes everything below a directory and recreates it empty.

use clap::Args;
use mb_core::BlobStore as _;
use serde::Serialize;

use super::{fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Empty a directory
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Target directory (account:/login/stor/dir)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct ClearOutput {
    status: &'static str,
    bucket: String,
}

/// Execute the clear command
pub async fn execute(args: ClearArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_target(&args.target, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let store = match open_store(&target.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if let Err(e) = store.get_bucket(&target.path).await {
        return fail(&formatter, &format!("Cannot clear '{}'", target.path), &e);
    }

    match store.clear_bucket(&target.path).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ClearOutput {
                    status: "success",
                    bucket: target.path.clone(),
                });
            } else {
                formatter.success(&format!("Directory '{target}' cleared."));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to clear directory", &e),
    }
}
