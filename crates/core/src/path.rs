//! Path parsing and resolution
//!
//! Remote paths are plain strings understood by the store, shaped like
//! `/<login>/<stor|public>/<dir>/.../<leaf>`. The helpers here split them into
//! container and leaf parts without touching the store.
//!
//! CLI targets use the format `account:/remote/path`. Anything else is a
//! local path and is passed through as-is.

use crate::error::{Error, Result};

/// Path separator used by the remote store
pub const SEPARATOR: char = '/';

/// Returns everything up to and including the last separator.
///
/// Empty when the path contains no separator.
pub fn container_of(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[..=pos],
        None => "",
    }
}

/// Returns everything after the last separator.
///
/// The whole string when the path contains no separator.
pub fn leaf_of(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Directory path without trailing separators, e.g. `/jdoe/stor/dir`
pub fn directory_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() && !path.is_empty() {
        &path[..1]
    } else {
        trimmed
    }
}

/// Private storage root of an account: `/<login>/stor/`
pub fn private_root(login: &str) -> String {
    format!("/{login}/stor/")
}

/// Public storage root of an account: `/<login>/public`
///
/// No trailing separator, so it also matches the directory itself.
pub fn public_root(login: &str) -> String {
    format!("/{login}/public")
}

/// A remote path qualified with the account profile it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Account profile name
    pub account: String,
    /// Full path inside the store
    pub path: String,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(account: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            path: path.into(),
        }
    }

    /// Whether the path names a directory (trailing separator)
    pub fn is_dir(&self) -> bool {
        self.path.ends_with(SEPARATOR)
    }

    /// Container part of the path
    pub fn container(&self) -> &str {
        container_of(&self.path)
    }

    /// Leaf part of the path
    pub fn leaf(&self) -> &str {
        leaf_of(&self.path)
    }

    /// Join a child name onto a directory path
    pub fn join(&self, child: &str) -> Self {
        let base = self.path.trim_end_matches(SEPARATOR);
        Self {
            account: self.account.clone(),
            path: format!("{base}/{child}"),
        }
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.account, self.path)
    }
}

/// Parsed path that can be either local or remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    /// Local filesystem path
    Local(std::path::PathBuf),
    /// Remote store path
    Remote(RemotePath),
}

impl ParsedPath {
    /// Check if this is a remote path
    pub fn is_remote(&self) -> bool {
        matches!(self, ParsedPath::Remote(_))
    }

    /// Check if this is a local path
    pub fn is_local(&self) -> bool {
        matches!(self, ParsedPath::Local(_))
    }

    /// Get the remote path if this is a remote path
    pub fn as_remote(&self) -> Option<&RemotePath> {
        match self {
            ParsedPath::Remote(p) => Some(p),
            ParsedPath::Local(_) => None,
        }
    }

    /// Get the local path if this is a local path
    pub fn as_local(&self) -> Option<&std::path::PathBuf> {
        match self {
            ParsedPath::Local(p) => Some(p),
            ParsedPath::Remote(_) => None,
        }
    }
}

/// Parse a path string into a ParsedPath
///
/// Remote paths have the format `account:/path`. The account name must be a
/// valid profile name and the path must be absolute. Everything else is local.
pub fn parse_path(path: &str) -> Result<ParsedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let Some((account, remote)) = path.split_once(':') else {
        return Ok(ParsedPath::Local(std::path::PathBuf::from(path)));
    };

    // Windows drive letters and odd local names stay local
    if !is_valid_account_name(account) || account.len() == 1 {
        return Ok(ParsedPath::Local(std::path::PathBuf::from(path)));
    }

    if !remote.starts_with(SEPARATOR) {
        return Err(Error::InvalidPath(format!(
            "Remote path '{remote}' must be absolute. Use format: account:/login/stor/dir/"
        )));
    }

    Ok(ParsedPath::Remote(RemotePath::new(account, remote)))
}

/// Parse a path that must be remote
pub fn parse_remote_path(path: &str) -> Result<RemotePath> {
    match parse_path(path)? {
        ParsedPath::Remote(remote) => Ok(remote),
        ParsedPath::Local(_) => Err(Error::InvalidPath(format!(
            "'{path}' is not a remote path. Use format: account:/login/stor/dir/"
        ))),
    }
}

/// Check if a string is a valid account profile name
pub fn is_valid_account_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
