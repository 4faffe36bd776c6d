//! Account management
//!
//! Accounts are named references to a store: where it lives, which login owns
//! the `/<login>/...` tree, and the region reported on every entry.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// An account represents one login on one store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique name for this account profile
    pub name: String,

    /// Store URL; `file://` URLs point at a local directory tree
    pub url: String,

    /// Login that owns `/<login>/stor` and `/<login>/public`
    pub login: String,

    /// Region identifier reported on entries
    #[serde(default = "default_region")]
    pub region: String,

    /// Path to the private key used to sign requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,

    /// Fingerprint of the signing key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_fingerprint: Option<String>,
}

fn default_region() -> String {
    "us-east".to_string()
}

impl Account {
    /// Create a new account with required fields
    pub fn new(name: impl Into<String>, url: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            login: login.into(),
            region: default_region(),
            key_path: None,
            key_fingerprint: None,
        }
    }

    /// Parsed store URL
    pub fn store_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.url)?)
    }

    /// Local directory backing the store, for `file://` accounts
    pub fn local_root(&self) -> Result<PathBuf> {
        let url = self.store_url()?;
        if url.scheme() != "file" {
            return Err(Error::Config(format!(
                "Account '{}' uses scheme '{}'; only file:// stores can be opened locally",
                self.name,
                url.scheme()
            )));
        }
        url.to_file_path()
            .map_err(|_| Error::Config(format!("Invalid file URL: {}", self.url)))
    }
}

/// Manager for account operations
pub struct AccountManager {
    config_manager: ConfigManager,
}

impl AccountManager {
    /// Create a new AccountManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new AccountManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured accounts
    pub fn list(&self) -> Result<Vec<Account>> {
        let config = self.config_manager.load()?;
        Ok(config.accounts)
    }

    /// Get an account by name
    pub fn get(&self, name: &str) -> Result<Account> {
        let config = self.config_manager.load()?;
        config
            .accounts
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))
    }

    /// Add or update an account
    pub fn set(&self, account: Account) -> Result<()> {
        let mut config = self.config_manager.load()?;

        config.accounts.retain(|a| a.name != account.name);
        config.accounts.push(account);

        self.config_manager.save(&config)
    }

    /// Remove an account
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.accounts.len();

        config.accounts.retain(|a| a.name != name);

        if config.accounts.len() == original_len {
            return Err(Error::AccountNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if an account exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.accounts.iter().any(|a| a.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_account_manager() -> (AccountManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        let account_manager = AccountManager::with_config_manager(config_manager);
        (account_manager, temp_dir)
    }

    #[test]
    fn test_account_new() {
        let account = Account::new("dev", "file:///srv/manta", "jdoe");
        assert_eq!(account.name, "dev");
        assert_eq!(account.login, "jdoe");
        assert_eq!(account.region, "us-east");
        assert!(account.key_path.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_local_root() {
        let account = Account::new("dev", "file:///srv/manta", "jdoe");
        assert_eq!(account.local_root().unwrap(), PathBuf::from("/srv/manta"));
    }

    #[test]
    fn test_local_root_rejects_remote_scheme() {
        let account = Account::new("prod", "https://us-east.manta.example.com", "jdoe");
        assert!(matches!(account.local_root(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_url() {
        let account = Account::new("bad", "not a url", "jdoe");
        assert!(matches!(account.store_url(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_account_manager_set_and_get() {
        let (manager, _temp_dir) = temp_account_manager();

        manager
            .set(Account::new("dev", "file:///srv/manta", "jdoe"))
            .unwrap();

        let retrieved = manager.get("dev").unwrap();
        assert_eq!(retrieved.login, "jdoe");
        assert_eq!(retrieved.url, "file:///srv/manta");
    }

    #[test]
    fn test_account_manager_list_and_update() {
        let (manager, _temp_dir) = temp_account_manager();

        manager.set(Account::new("a", "file:///a", "x")).unwrap();
        manager.set(Account::new("b", "file:///b", "y")).unwrap();
        manager.set(Account::new("a", "file:///a2", "x")).unwrap();

        let accounts = manager.list().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(manager.get("a").unwrap().url, "file:///a2");
    }

    #[test]
    fn test_account_manager_remove() {
        let (manager, _temp_dir) = temp_account_manager();

        manager.set(Account::new("dev", "file:///srv", "jdoe")).unwrap();
        assert!(manager.exists("dev").unwrap());

        manager.remove("dev").unwrap();
        assert!(!manager.exists("dev").unwrap());

        let result = manager.remove("dev");
        assert!(matches!(result, Err(Error::AccountNotFound(_))));
    }
}
