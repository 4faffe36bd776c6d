//! ping command - Check subscription
//!
//! Lists the login's private root. A refused listing means the account is
//! not subscribed; any other failure is reported as an error.

use clap::Args;
use mb_core::BlobStore as _;
use serde::Serialize;

use super::{fail, open_store};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Check subscription
#[derive(Args, Debug)]
pub struct PingArgs {
    /// Account profile name
    pub account: String,
}

#[derive(Debug, Serialize)]
struct PingOutput {
    account: String,
    subscribed: bool,
}

/// Execute the ping command
pub async fn execute(args: PingArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let store = match open_store(&args.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let subscribed = match store.is_subscribed().await {
        Ok(subscribed) => subscribed,
        Err(e) => return fail(&formatter, "Subscription check failed", &e),
    };

    if formatter.is_json() {
        formatter.json(&PingOutput {
            account: args.account,
            subscribed,
        });
    } else if subscribed {
        formatter.success(&format!("Account '{}' is subscribed.", args.account));
    } else {
        formatter.warning(&format!("Account '{}' is not subscribed.", args.account));
    }

    if subscribed {
        ExitCode::Success
    } else {
        ExitCode::AuthError
    }
}
