//! The shared account directory.
//!
//! The directory is built once at startup and never grows or shrinks. Each
//! account carries its own lock so logins against different accounts never
//! contend.

pub mod account;
pub mod registry;

pub use account::{AccountSnapshot, AccountState, UserAccount};
pub use registry::UserDirectory;
