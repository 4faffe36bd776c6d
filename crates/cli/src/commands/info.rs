//! info command - Show store capabilities
//!
//! Prints the capability flags, limits and naming rules of the store behind
//! an account.

use clap::Args;
use mb_core::{BlobStore as _, Capabilities, NameRules};
use serde::Serialize;

use super::open_store;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show store capabilities
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Account profile name
    pub account: String,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    account: String,
    login: String,
    region: String,
    capabilities: Capabilities,
    bucket_name_rules: NameRules,
    object_name_rules: NameRules,
}

/// Execute the info command
pub async fn execute(args: InfoArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let store = match open_store(&args.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let output = InfoOutput {
        account: args.account,
        login: store.login().to_string(),
        region: store.region_id().to_string(),
        capabilities: store.capabilities(),
        bucket_name_rules: store.bucket_name_rules(),
        object_name_rules: store.object_name_rules(),
    };

    if formatter.is_json() {
        formatter.json(&output);
    } else {
        formatter.table(&["Property", "Value"], rows(&output));
    }
    ExitCode::Success
}

fn rows(output: &InfoOutput) -> Vec<Vec<String>> {
    let caps = &output.capabilities;
    let rules = &output.bucket_name_rules;
    let denied: String = rules.denied_chars.iter().collect();

    vec![
        vec!["Account".into(), output.account.clone()],
        vec!["Login".into(), output.login.clone()],
        vec!["Region".into(), output.region.clone()],
        vec!["Bucket term".into(), caps.bucket_term.into()],
        vec!["Object term".into(), caps.object_term.into()],
        vec!["Nested buckets".into(), caps.allows_nested_buckets.to_string()],
        vec!["Root objects".into(), caps.allows_root_objects.to_string()],
        vec!["Public sharing".into(), caps.allows_public_sharing.to_string()],
        vec!["Max buckets".into(), caps.max_buckets.to_string()],
        vec![
            "Max object size".into(),
            humansize::format_size(caps.max_object_size, humansize::BINARY),
        ],
        vec![
            "Max objects per bucket".into(),
            caps.max_objects_per_bucket.to_string(),
        ],
        vec![
            "Name length".into(),
            format!("{}..{}", rules.min_chars, rules.max_chars),
        ],
        vec!["Denied characters".into(), denied],
    ]
}
