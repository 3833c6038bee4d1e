//! Account directory configuration.

use serde::{Deserialize, Serialize};

/// The fixed set of accounts loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Accounts in directory order. Position determines the account id.
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
        }
    }
}

/// A single account entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Login name.
    pub name: String,
    /// Shared secret compared verbatim on login and elevation.
    pub secret: String,
}

impl AccountConfig {
    /// Create an account entry.
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }
}

fn default_accounts() -> Vec<AccountConfig> {
    [
        ("superadmin", "P@ssw0rd!"),
        ("auditor", "Secur3!2023"),
        ("dev_user", "d3v3l0p3r"),
        ("tester", "t3st3r!123"),
        ("analyst", "Data2023!"),
        ("support", "HelpDesk!"),
        ("reports", "R3port$"),
        ("backup", "B@ckUp123"),
        ("api_user", "Ap1K3y!2023"),
        ("guest", "T3mpPass!"),
    ]
    .into_iter()
    .map(|(name, secret)| AccountConfig::new(name, secret))
    .collect()
}
