//! rb command - Remove bucket
//!
//! Removes a directory. A non-empty directory is removed with everything
//! below it.

use clap::Args;
use mb_core::BlobStore as _;
use serde::Serialize;

use super::{fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove a directory
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Target directory (account:/login/stor/dir)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct RbOutput {
    status: &'static str,
    bucket: String,
}

/// Execute the rb command
pub async fn execute(args: RbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_target(&args.target, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let store = match open_store(&target.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.get_bucket(&target.path).await {
        Ok(_) => {}
        Err(e) => return fail(&formatter, &format!("Cannot remove '{}'", target.path), &e),
    }

    match store.remove_bucket(&target.path).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&RbOutput {
                    status: "success",
                    bucket: target.path.clone(),
                });
            } else {
                formatter.success(&format!("Directory '{target}' removed successfully."));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to remove directory", &e),
    }
}
