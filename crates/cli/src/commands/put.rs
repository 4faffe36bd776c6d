//! put command - Upload a file
//!
//! Uploads a local file into a directory, creating the directory if its
//! parent exists.

use std::path::PathBuf;

use clap::Args;
use mb_core::{BlobStore as _, directory_path};
use serde::Serialize;

use super::{fail, open_store, parse_target};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Upload a local file
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub source: PathBuf,

    /// Target directory (account:/login/stor/dir/)
    pub target: String,

    /// Object name (defaults to the source file name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_target(&args.target, &formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    if !args.source.is_file() {
        formatter.error(&format!("'{}' is not a file", args.source.display()));
        return ExitCode::UsageError;
    }

    let name = match object_name(&args) {
        Some(name) => name,
        None => {
            formatter.error("Object name cannot be empty or contain '/'; use --name");
            return ExitCode::UsageError;
        }
    };

    let store = match open_store(&target.account, &formatter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let bucket = format!("{}/", directory_path(&target.path));
    let spinner = ProgressBar::spinner(formatter.config(), &format!("Uploading {name}"));
    let result = store.upload(&args.source, Some(&bucket), &name).await;
    spinner.finish_and_clear();

    match result {
        Ok(entry) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    status: "success",
                    source: args.source.display().to_string(),
                    target: entry.path(),
                    size_bytes: entry.size_bytes,
                    size_human: entry.size_human,
                });
            } else {
                formatter.success(&format!(
                    "{} -> {}:{} ({})",
                    args.source.display(),
                    target.account,
                    entry.path(),
                    entry.size_human.as_deref().unwrap_or("0 B")
                ));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Upload failed", &e),
    }
}

/// Explicit name, or the source's file name
fn object_name(args: &PutArgs) -> Option<String> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => args.source.file_name()?.to_string_lossy().into_owned(),
    };
    if name.is_empty() || name.contains('/') {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(source: &str, name: Option<&str>) -> PutArgs {
        PutArgs {
            source: PathBuf::from(source),
            target: "dev:/jdoe/stor/docs".to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_object_name_from_source() {
        assert_eq!(object_name(&args("/tmp/report.txt", None)).unwrap(), "report.txt");
    }

    #[test]
    fn test_object_name_override() {
        assert_eq!(
            object_name(&args("/tmp/report.txt", Some("final.txt"))).unwrap(),
            "final.txt"
        );
    }

    #[test]
    fn test_object_name_rejects_nested() {
        assert!(object_name(&args("/tmp/report.txt", Some("a/b.txt"))).is_none());
        assert!(object_name(&args("/tmp/report.txt", Some(""))).is_none());
    }
}
