//! # authgate-auth
//!
//! Account directory and session authentication for AuthGate.
//!
//! ## Modules
//!
//! - `directory`: the fixed set of accounts, each behind its own lock
//! - `session`: the per-stream login/elevate/list state machine

pub mod directory;
pub mod session;

pub use directory::{AccountSnapshot, AccountState, UserAccount, UserDirectory};
pub use session::{
    AuthOutcome, LoginPolicy, OutcomeKind, Session, SessionAuthenticator, SessionState,
    StreamReport,
};
