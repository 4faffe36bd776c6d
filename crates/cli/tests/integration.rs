//! Integration tests for the mbs CLI
//!
//! Every test runs the binary against a `file://` account rooted in a temporary
//! directory, with its own configuration directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Isolated configuration directory plus a provisioned `dev` account
struct TestEnv {
    temp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let env = Self { temp };

        let store_url = format!("file://{}", env.store_root().display());
        let output = env.run(&[
            "account",
            "set",
            "dev",
            &store_url,
            "jdoe",
            "--provision",
        ]);
        assert!(output.status.success(), "{}", stderr(&output));
        env
    }

    fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    fn store_root(&self) -> PathBuf {
        self.temp.path().join("store")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_mbs"))
            .args(args)
            .env("MBS_CONFIG_DIR", self.config_dir())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute mbs command")
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = args.to_vec();
        full.push("--json");
        let output = self.run(&full);
        assert!(output.status.success(), "{}", stderr(&output));
        serde_json::from_slice(&output.stdout).expect("valid JSON output")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_file(path: &Path, data: &[u8]) {
    std::fs::write(path, data).expect("write source file");
}

#[test]
fn test_account_list() {
    let env = TestEnv::new();

    let json = env.run_json(&["account", "list"]);
    let accounts = json["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["name"], "dev");
    assert_eq!(accounts[0]["login"], "jdoe");
    assert_eq!(accounts[0]["region"], "us-east");

    assert!(env.store_root().join("jdoe/stor").is_dir());
    assert!(env.store_root().join("jdoe/public").is_dir());
}

#[test]
fn test_account_remove_missing() {
    let env = TestEnv::new();

    let output = env.run(&["account", "remove", "nope"]);
    assert_eq!(output.status.code(), Some(5));

    let output = env.run(&["account", "remove", "dev"]);
    assert!(output.status.success());
}

#[test]
fn test_unknown_account() {
    let env = TestEnv::new();

    let output = env.run(&["ls", "prod:/jdoe/stor"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_relative_remote_path_is_usage_error() {
    let env = TestEnv::new();

    let output = env.run(&["ls", "dev:jdoe/stor"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_put_ls_stat_get() {
    let env = TestEnv::new();

    let output = env.run(&["mb", "dev:/jdoe/stor/docs"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let source = env.path("report.txt");
    write_file(&source, b"quarterly numbers");
    let json = env.run_json(&["put", source.to_str().unwrap(), "dev:/jdoe/stor/docs/"]);
    assert_eq!(json["target"], "/jdoe/stor/docs/report.txt");
    assert_eq!(json["size_bytes"], 17);

    let json = env.run_json(&["ls", "dev:/jdoe/stor/docs", "--summarize"]);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["container"], "/jdoe/stor/docs/");
    assert_eq!(items[0]["name"], "report.txt");
    assert_eq!(json["summary"]["total_objects"], 1);

    let json = env.run_json(&["stat", "dev:/jdoe/stor/docs/report.txt"]);
    assert_eq!(json["type"], "object");
    assert_eq!(json["size_bytes"], 17);
    assert_eq!(json["public"], false);

    let json = env.run_json(&["stat", "dev:/jdoe/stor/docs"]);
    assert_eq!(json["type"], "directory");

    let destination = env.path("downloaded.txt");
    let json = env.run_json(&[
        "get",
        "dev:/jdoe/stor/docs/report.txt",
        destination.to_str().unwrap(),
    ]);
    assert_eq!(json["size_bytes"], 17);
    assert_eq!(
        std::fs::read(&destination).unwrap(),
        b"quarterly numbers".to_vec()
    );
}

#[test]
fn test_get_missing_object() {
    let env = TestEnv::new();

    let output = env.run(&[
        "get",
        "dev:/jdoe/stor/missing.bin",
        env.path("out.bin").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(5));
    assert!(!env.path("out.bin").exists());
}

#[test]
fn test_mb_requires_parent() {
    let env = TestEnv::new();

    let output = env.run(&["mb", "dev:/jdoe/stor/a/b"]);
    assert_eq!(output.status.code(), Some(5));

    let output = env.run(&["mb", "-p", "dev:/jdoe/stor/a/b"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(env.store_root().join("jdoe/stor/a/b").is_dir());

    // Creating an existing directory is not an error
    let output = env.run(&["mb", "dev:/jdoe/stor/a/b"]);
    assert!(output.status.success());
}

#[test]
fn test_mb_rejects_denied_characters() {
    let env = TestEnv::new();

    let output = env.run(&["mb", "dev:/jdoe/stor/my-dir"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_mv_and_rm() {
    let env = TestEnv::new();

    let source = env.path("old.txt");
    write_file(&source, b"payload");
    let output = env.run(&["put", source.to_str().unwrap(), "dev:/jdoe/stor/"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = env.run(&["mv", "dev:/jdoe/stor/old.txt", "dev:/jdoe/stor/new.txt"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!env.store_root().join("jdoe/stor/old.txt").exists());
    assert_eq!(
        std::fs::read(env.store_root().join("jdoe/stor/new.txt")).unwrap(),
        b"payload".to_vec()
    );

    let output = env.run(&["rm", "dev:/jdoe/stor/new.txt"]);
    assert!(output.status.success());

    let output = env.run(&["rm", "dev:/jdoe/stor/new.txt"]);
    assert_eq!(output.status.code(), Some(5));

    let output = env.run(&["rm", "--force", "dev:/jdoe/stor/new.txt"]);
    assert!(output.status.success());
}

#[test]
fn test_rb_and_clear_non_empty() {
    let env = TestEnv::new();

    let source = env.path("data.bin");
    write_file(&source, &[7u8; 64]);

    for dir in ["dev:/jdoe/stor/keep", "dev:/jdoe/stor/drop"] {
        let output = env.run(&["mb", dir]);
        assert!(output.status.success(), "{}", stderr(&output));
        let output = env.run(&["put", source.to_str().unwrap(), dir]);
        assert!(output.status.success(), "{}", stderr(&output));
    }

    let output = env.run(&["clear", "dev:/jdoe/stor/keep"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let json = env.run_json(&["ls", "dev:/jdoe/stor/keep"]);
    assert!(json["items"].as_array().unwrap().is_empty());

    let output = env.run(&["rb", "dev:/jdoe/stor/drop"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!env.store_root().join("jdoe/stor/drop").exists());

    let output = env.run(&["rb", "dev:/jdoe/stor/drop"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_ls_without_directory_fails() {
    let env = TestEnv::new();

    let output = env.run(&["ls", "dev:/jdoe/stor/nothing"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_public_visibility() {
    let env = TestEnv::new();

    let json = env.run_json(&["public", "dev:/jdoe/public/site/"]);
    assert_eq!(json["public"], true);

    let json = env.run_json(&["public", "dev:/jdoe/stor/site/index.html"]);
    assert_eq!(json["public"], false);

    let output = env.run(&["public", "--set", "dev:/jdoe/stor/site/"]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_info_and_ping() {
    let env = TestEnv::new();

    let json = env.run_json(&["info", "dev"]);
    assert_eq!(json["capabilities"]["bucket_term"], "directory");
    assert_eq!(json["capabilities"]["allows_nested_buckets"], false);
    assert_eq!(json["capabilities"]["max_objects_per_bucket"], 1_000_000);

    let json = env.run_json(&["ping", "dev"]);
    assert_eq!(json["subscribed"], true);
}
