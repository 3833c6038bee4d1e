//! A single directory account and its lock-protected state.

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use authgate_core::types::{AccountId, StreamId};

/// Mutable part of an account. Only reachable through the account lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    /// Stream currently bound to the account.
    pub occupant: Option<StreamId>,
    /// Failed logins since the last successful bind.
    pub failure_count: u32,
}

/// A directory entry: immutable identity plus lock-protected state.
#[derive(Debug)]
pub struct UserAccount {
    id: AccountId,
    name: String,
    secret: String,
    state: Mutex<AccountState>,
}

impl UserAccount {
    /// Create an unbound account with no recorded failures.
    pub fn new(id: AccountId, name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            secret: secret.into(),
            state: Mutex::new(AccountState::default()),
        }
    }

    /// Account id (position in the directory).
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Login name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compare a presented credential against the account secret.
    ///
    /// The secret never changes after construction, so this needs no lock.
    pub fn secret_matches(&self, credential: &str) -> bool {
        self.secret == credential
    }

    /// Acquire this account's lock.
    pub async fn lock(&self) -> MutexGuard<'_, AccountState> {
        self.state.lock().await
    }

    /// Copy of the current state, taken under the lock.
    pub async fn snapshot(&self) -> AccountSnapshot {
        let state = self.state.lock().await;
        AccountSnapshot {
            id: self.id,
            name: self.name.clone(),
            occupant: state.occupant.clone(),
            failure_count: state.failure_count,
        }
    }
}

/// Point-in-time view of an account, safe to hand out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    /// Account id.
    pub id: AccountId,
    /// Login name.
    pub name: String,
    /// Bound stream, if any.
    pub occupant: Option<StreamId>,
    /// Failed logins since the last successful bind.
    pub failure_count: u32,
}
