//! mv command - Rename an object
//!
//! Links the object under its new name, then deletes the old name. If the
//! delete fails both names stay valid.

use clap::Args;
use mb_core::BlobStore as _;
use serde::Serialize;

use super::{fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Rename an object
#[derive(Args, Debug)]
pub struct MvArgs {
    /// Current object path (account:/login/stor/dir/object)
    pub source: String,

    /// New object path on the same account
    pub target: String,
}

#[derive(Debug, Serialize)]
struct MvOutput {
    status: &'static str,
    source: String,
    target: String,
}

/// Execute the mv command
pub async fn execute(args: MvArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let source = match parse_target(&args.source, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let target = match parse_target(&args.target, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    if source.account != target.account {
        formatter.error("Objects can only be renamed within one account");
        return ExitCode::UsageError;
    }
    if source.is_dir() || target.is_dir() {
        formatter.error("Source and target must name objects, not directories");
        return ExitCode::UsageError;
    }

    let store = match open_store(&source.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.rename_object(None, &source.path, &target.path).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&MvOutput {
                    status: "success",
                    source: source.path.clone(),
                    target: target.path.clone(),
                });
            } else {
                formatter.success(&format!("{source} -> {}", target.path));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Rename failed", &e),
    }
}
