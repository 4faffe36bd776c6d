//! mb command - Make bucket
//!
//! Creates a directory. The parent must exist unless `--parents` is given.

use clap::Args;
use mb_core::{BlobStore as _, directory_path, leaf_of};
use serde::Serialize;

use super::{Store, fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a directory
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Target directory (account:/login/stor/dir)
    pub target: String,

    /// Create missing parent directories as well
    #[arg(short = 'p', long)]
    pub parents: bool,
}

#[derive(Debug, Serialize)]
struct MbOutput {
    status: &'static str,
    bucket: String,
    region: String,
}

/// Execute the mb command
pub async fn execute(args: MbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_target(&args.target, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let dir = directory_path(&target.path).to_string();

    let store = match open_store(&target.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let name = leaf_of(&dir);
    if !store.bucket_name_rules().permits(name) {
        formatter.error(&format!(
            "Invalid {} name '{name}': characters {:?} are not allowed",
            store.provider_term_for_bucket(),
            store.bucket_name_rules().denied_chars
        ));
        return ExitCode::UsageError;
    }

    let chain = if args.parents {
        match ancestors(&dir) {
            Some(chain) => chain,
            None => {
                formatter.error(&format!(
                    "'{dir}' is not below /<login>/stor or /<login>/public"
                ));
                return ExitCode::UsageError;
            }
        }
    } else {
        vec![dir.clone()]
    };

    match create_all(&store, &chain).await {
        Ok(region) => {
            if formatter.is_json() {
                formatter.json(&MbOutput {
                    status: "success",
                    bucket: dir,
                    region,
                });
            } else {
                formatter.success(&format!(
                    "Directory '{}:{dir}' created successfully.",
                    target.account
                ));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, &format!("Failed to create '{dir}'"), &e),
    }
}

async fn create_all(store: &Store, chain: &[String]) -> mb_core::Result<String> {
    let mut region = String::new();
    for dir in chain {
        let entry = store.create_bucket(dir, false).await?;
        region = entry.region_id;
    }
    Ok(region)
}

/// Every directory from just below `/<login>/<area>` down to `dir`
fn ancestors(dir: &str) -> Option<Vec<String>> {
    let segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 3 {
        return None;
    }

    let mut current = format!("/{}/{}", segments[0], segments[1]);
    let mut chain = Vec::with_capacity(segments.len() - 2);
    for segment in &segments[2..] {
        current.push('/');
        current.push_str(segment);
        chain.push(current.clone());
    }
    Some(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestors() {
        let chain = ancestors("/jdoe/stor/a/b/c").unwrap();
        assert_eq!(
            chain,
            vec!["/jdoe/stor/a", "/jdoe/stor/a/b", "/jdoe/stor/a/b/c"]
        );
    }

    #[test]
    fn test_ancestors_single_level() {
        assert_eq!(ancestors("/jdoe/public/site").unwrap(), vec!["/jdoe/public/site"]);
    }

    #[test]
    fn test_ancestors_area_root() {
        assert!(ancestors("/jdoe/stor").is_none());
        assert!(ancestors("/").is_none());
    }
}
