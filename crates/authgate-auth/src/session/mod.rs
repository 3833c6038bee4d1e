//! Per-stream session authentication.

pub mod authenticator;
pub mod outcome;
pub mod state;

pub use authenticator::{LoginPolicy, SessionAuthenticator, StreamReport};
pub use outcome::{AuthOutcome, OutcomeKind};
pub use state::{Session, SessionState};
