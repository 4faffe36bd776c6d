//! public command - Check visibility
//!
//! Visibility follows location: everything under `/<login>/public` is
//! public, everything else private. `--set` asks the store to change it,
//! which a directory store refuses.

use clap::Args;
use mb_core::BlobStore as _;
use serde::Serialize;

use super::{fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Check visibility
#[derive(Args, Debug)]
pub struct PublicArgs {
    /// Remote path (account:/login/public/dir/ or account:/login/stor/dir/object)
    pub path: String,

    /// Make the path public instead of reporting its visibility
    #[arg(long)]
    pub set: bool,
}

#[derive(Debug, Serialize)]
struct PublicOutput {
    path: String,
    public: bool,
}

/// Execute the public command
pub async fn execute(args: PublicArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_target(&args.path, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let store = match open_store(&target.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if args.set {
        let result = if target.is_dir() {
            store.make_bucket_public(&target.path).await
        } else {
            store
                .make_object_public(Some(target.container()), target.leaf())
                .await
        };
        return match result {
            Ok(()) => {
                formatter.success(&format!("'{target}' is now public."));
                ExitCode::Success
            }
            Err(e) => fail(&formatter, "Cannot change visibility", &e),
        };
    }

    let public = if target.is_dir() {
        store.is_public(Some(&target.path), None)
    } else {
        store.is_public(Some(target.container()), Some(target.leaf()))
    };

    if formatter.is_json() {
        formatter.json(&PublicOutput {
            path: target.path.clone(),
            public,
        });
    } else {
        let visibility = if public { "public" } else { "private" };
        formatter.println(&format!("{target}: {visibility}"));
    }
    ExitCode::Success
}
