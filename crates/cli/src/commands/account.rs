//! Account profile commands
//!
//! An account names a store location and the login that owns the
//! `/<login>/stor` and `/<login>/public` trees on it.

use clap::Subcommand;
use mb_core::{Account, AccountManager, Error};
use mb_manta::LocalGateway;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Account subcommands
#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Add or update an account profile
    Set(SetArgs),

    /// List all configured account profiles
    List(ListArgs),

    /// Remove an account profile
    Remove(RemoveArgs),
}

/// Arguments for the `account set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "dev", "prod")
    pub name: String,

    /// Store URL (e.g., "file:///srv/manta")
    pub url: String,

    /// Login owning the storage tree
    pub login: String,

    /// Region reported on entries
    #[arg(long, default_value = "us-east")]
    pub region: String,

    /// Private key used to sign requests
    #[arg(long)]
    pub key_path: Option<String>,

    /// Fingerprint of the signing key
    #[arg(long)]
    pub key_fingerprint: Option<String>,

    /// Create the login's stor and public directories on a file:// store
    #[arg(long)]
    pub provision: bool,
}

/// Arguments for the `account list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details in a table
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `account remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// JSON output for account list
#[derive(Serialize)]
struct AccountListOutput {
    accounts: Vec<AccountInfo>,
}

/// Account information for JSON output (key material omitted)
#[derive(Serialize)]
struct AccountInfo {
    name: String,
    url: String,
    login: String,
    region: String,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            url: account.url.clone(),
            login: account.login.clone(),
            region: account.region.clone(),
        }
    }
}

/// JSON output for account set/remove operations
#[derive(Serialize)]
struct AccountOperationOutput {
    success: bool,
    account: String,
    message: String,
}

/// Execute an account subcommand
pub async fn execute(cmd: AccountCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let account_manager = match AccountManager::new() {
        Ok(am) => am,
        Err(e) => {
            formatter.error(&format!("Failed to load accounts: {e}"));
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        AccountCommands::Set(args) => execute_set(args, &account_manager, &formatter).await,
        AccountCommands::List(args) => execute_list(args, &account_manager, &formatter),
        AccountCommands::Remove(args) => execute_remove(args, &account_manager, &formatter),
    }
}

async fn execute_set(args: SetArgs, manager: &AccountManager, formatter: &Formatter) -> ExitCode {
    if !mb_core::path::is_valid_account_name(&args.name) || args.name.len() == 1 {
        formatter.error("Account name must be at least two letters, digits, '-' or '_'");
        return ExitCode::UsageError;
    }

    if args.login.is_empty() || args.login.contains('/') {
        formatter.error("Login cannot be empty or contain '/'");
        return ExitCode::UsageError;
    }

    let mut account = Account::new(&args.name, &args.url, &args.login);
    account.region = args.region;
    account.key_path = args.key_path;
    account.key_fingerprint = args.key_fingerprint;

    if let Err(e) = account.store_url() {
        formatter.error(&e.to_string());
        return ExitCode::UsageError;
    }

    if args.provision {
        let root = match account.local_root() {
            Ok(root) => root,
            Err(e) => {
                formatter.error(&e.to_string());
                return ExitCode::UsageError;
            }
        };
        if let Err(e) = LocalGateway::new(root).provision(&account.login).await {
            formatter.error(&format!("Failed to provision '{}': {e}", account.login));
            return ExitCode::GeneralError;
        }
    }

    match manager.set(account) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&AccountOperationOutput {
                    success: true,
                    account: args.name.clone(),
                    message: format!("Account '{}' configured successfully", args.name),
                });
            } else {
                formatter.success(&format!("Account '{}' configured successfully.", args.name));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to save account: {e}"));
            ExitCode::from(&e)
        }
    }
}

fn execute_list(args: ListArgs, manager: &AccountManager, formatter: &Formatter) -> ExitCode {
    let accounts = match manager.list() {
        Ok(accounts) => accounts,
        Err(e) => {
            formatter.error(&format!("Failed to list accounts: {e}"));
            return ExitCode::from(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&AccountListOutput {
            accounts: accounts.iter().map(AccountInfo::from).collect(),
        });
    } else if accounts.is_empty() {
        formatter.println("No accounts configured.");
    } else if args.long {
        let rows = accounts
            .iter()
            .map(|a| {
                vec![
                    a.name.clone(),
                    a.url.clone(),
                    a.login.clone(),
                    a.region.clone(),
                ]
            })
            .collect();
        formatter.table(&["Name", "URL", "Login", "Region"], rows);
    } else {
        for account in &accounts {
            formatter.println(&format!("{:<12} {}", account.name, account.url));
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, manager: &AccountManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&AccountOperationOutput {
                    success: true,
                    account: args.name.clone(),
                    message: format!("Account '{}' removed successfully", args.name),
                });
            } else {
                formatter.success(&format!("Account '{}' removed successfully.", args.name));
            }
            ExitCode::Success
        }
        Err(Error::AccountNotFound(_)) => {
            formatter.error(&format!("Account '{}' not found", args.name));
            ExitCode::NotFound
        }
        Err(e) => {
            formatter.error(&format!("Failed to remove account: {e}"));
            ExitCode::from(&e)
        }
    }
}
