//! Login policy configuration.

use serde::{Deserialize, Serialize};

/// Login policy applied by every session authenticator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Failed attempts after which an account refuses all logins.
    ///
    /// There is no unlock path; a locked account stays locked until restart.
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold: u32,
    /// What a session remembers after failing to log into another account.
    #[serde(default)]
    pub rebind_failure_policy: RebindFailurePolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            lockout_threshold: default_lockout_threshold(),
            rebind_failure_policy: RebindFailurePolicy::default(),
        }
    }
}

/// Session tracking after a failed login while already bound elsewhere.
///
/// The directory is never touched by this policy: the previously bound
/// account keeps the stream as its occupant either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebindFailurePolicy {
    /// Keep the prior binding; later elevation and listing keep working.
    #[default]
    KeepPrior,
    /// Forget the prior binding; later elevation and listing are ignored
    /// until the stream logs in again.
    DropTracking,
}

impl std::fmt::Display for RebindFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RebindFailurePolicy::KeepPrior => write!(f, "keep_prior"),
            RebindFailurePolicy::DropTracking => write!(f, "drop_tracking"),
        }
    }
}

fn default_lockout_threshold() -> u32 {
    3
}
