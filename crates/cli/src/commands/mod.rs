//! CLI command definitions and execution
//!
//! One module per command. Every command resolves an account profile, opens
//! the store behind it and maps store errors onto exit codes.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use mb_core::{AccountManager, ConfigManager, Error, RemotePath, parse_remote_path};
use mb_manta::{LocalGateway, MantaStore};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod account;
mod clear;
mod completions;
mod get;
mod info;
mod ls;
mod mb;
mod mv;
mod ping;
mod public;
mod put;
mod rb;
mod rm;
mod stat;

/// mbs - Manta blob store client
///
/// Treats directories of a Manta-style store as buckets and files as objects.
/// Remote paths use the format `account:/login/stor/dir/object`.
#[derive(Parser, Debug)]
#[command(name = "mbs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage account profiles
    #[command(subcommand)]
    Account(account::AccountCommands),

    /// Create a directory
    Mb(mb::MbArgs),

    /// Remove a directory and everything below it
    Rb(rb::RbArgs),

    /// Empty a directory, keeping the directory itself
    Clear(clear::ClearArgs),

    /// List the entries of a directory
    Ls(ls::LsArgs),

    /// Show object or directory metadata
    Stat(stat::StatArgs),

    /// Upload a local file
    Put(put::PutArgs),

    /// Download an object to a local file
    Get(get::GetArgs),

    /// Rename an object
    Mv(mv::MvArgs),

    /// Remove an object
    Rm(rm::RmArgs),

    /// Show store capabilities and naming rules
    Info(info::InfoArgs),

    /// Check whether the account is subscribed to the store
    Ping(ping::PingArgs),

    /// Check whether a path is publicly visible
    Public(public::PublicArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    let output_config = match ConfigManager::new().and_then(|m| m.load()) {
        Ok(config) => output_config.with_defaults(&config.defaults),
        Err(e) => {
            tracing::debug!(error = %e, "Using flag defaults; configuration not loaded");
            output_config
        }
    };

    match cli.command {
        Commands::Account(cmd) => account::execute(cmd, output_config).await,
        Commands::Mb(args) => mb::execute(args, output_config).await,
        Commands::Rb(args) => rb::execute(args, output_config).await,
        Commands::Clear(args) => clear::execute(args, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Get(args) => get::execute(args, output_config).await,
        Commands::Mv(args) => mv::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Info(args) => info::execute(args, output_config).await,
        Commands::Ping(args) => ping::execute(args, output_config).await,
        Commands::Public(args) => public::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Store type every command talks to
pub(crate) type Store = MantaStore<LocalGateway>;

/// Parse an `account:/path` argument
pub(crate) fn parse_target(target: &str, formatter: &Formatter) -> Result<RemotePath, ExitCode> {
    parse_remote_path(target).map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::UsageError
    })
}

/// Open the store behind an account profile
pub(crate) fn open_store(account_name: &str, formatter: &Formatter) -> Result<Store, ExitCode> {
    let account_manager = match AccountManager::new() {
        Ok(am) => am,
        Err(e) => {
            formatter.error(&format!("Failed to load accounts: {e}"));
            return Err(ExitCode::GeneralError);
        }
    };

    let account = match account_manager.get(account_name) {
        Ok(a) => a,
        Err(Error::AccountNotFound(_)) => {
            formatter.error(&format!("Account '{account_name}' not found"));
            return Err(ExitCode::NotFound);
        }
        Err(e) => {
            formatter.error(&format!("Failed to get account: {e}"));
            return Err(ExitCode::GeneralError);
        }
    };

    let root = match account.local_root() {
        Ok(root) => root,
        Err(e) => {
            formatter.error(&e.to_string());
            return Err(ExitCode::from(&e));
        }
    };

    tracing::debug!(account = %account.name, root = %root.display(), "Opening store");
    Ok(MantaStore::for_account(
        Arc::new(LocalGateway::new(root)),
        &account,
    ))
}

/// Report a store error and return the matching exit code
pub(crate) fn fail(formatter: &Formatter, context: &str, err: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {err}"));
    ExitCode::from(err)
}
