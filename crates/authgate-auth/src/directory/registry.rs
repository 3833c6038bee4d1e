//! The fixed account directory shared by every authenticator.

use authgate_core::config::{AccountConfig, DirectoryConfig};
use authgate_core::types::AccountId;

use super::account::{AccountSnapshot, AccountState, UserAccount};

/// Fixed mapping from account id to account.
///
/// Constructed once at startup and shared behind an `Arc`. There is no
/// directory-wide lock: every mutation goes through a single account's lock.
#[derive(Debug)]
pub struct UserDirectory {
    accounts: Vec<UserAccount>,
}

impl UserDirectory {
    /// Build a directory from account entries. Ids follow entry order.
    pub fn new(entries: &[AccountConfig]) -> Self {
        let accounts = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| UserAccount::new(AccountId(idx), &entry.name, &entry.secret))
            .collect();

        Self { accounts }
    }

    /// Build a directory from the `[directory]` configuration section.
    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(&config.accounts)
    }

    /// Find the first account with the given name (lowest id wins).
    pub fn lookup_by_name(&self, name: &str) -> Option<AccountId> {
        self.accounts
            .iter()
            .find(|account| account.name() == name)
            .map(UserAccount::id)
    }

    /// Get an account by id.
    pub fn account(&self, id: AccountId) -> Option<&UserAccount> {
        self.accounts.get(id.index())
    }

    /// Run `f` while holding the lock of account `id` and nothing else.
    ///
    /// Returns `None` when the id is not part of the directory.
    pub async fn with_account_locked<R>(
        &self,
        id: AccountId,
        f: impl FnOnce(&UserAccount, &mut AccountState) -> R,
    ) -> Option<R> {
        let account = self.account(id)?;
        let mut state = account.lock().await;
        Some(f(account, &mut state))
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory has no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate over accounts in id order.
    pub fn iter(&self) -> impl Iterator<Item = &UserAccount> {
        self.accounts.iter()
    }

    /// Snapshot every account, one lock at a time.
    ///
    /// The result is not a consistent cut across accounts.
    pub async fn snapshot(&self) -> Vec<AccountSnapshot> {
        let mut out = Vec::with_capacity(self.accounts.len());
        for account in &self.accounts {
            out.push(account.snapshot().await);
        }
        out
    }
}
