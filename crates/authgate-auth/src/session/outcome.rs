//! Outcomes reported by the session authenticator, one per event.

use serde::Serialize;

use authgate_core::types::StreamId;

/// Result of applying one event to a session.
///
/// Failures are outcomes rather than errors: they are logged and the stream
/// moves on to its next event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthOutcome {
    /// Login succeeded and the stream now occupies the account.
    Bound { account: String },
    /// The stream already occupies the account; nothing changed.
    AlreadyBound { account: String },
    /// No account has the requested name.
    UnknownUser { name: String },
    /// Another stream occupies the account.
    OccupantConflict { account: String, holder: StreamId },
    /// The account reached the failure threshold and refuses logins.
    AccountLocked { account: String },
    /// Wrong secret on login. `failures` is the account count afterwards.
    BadCredential { account: String, failures: u32 },
    /// Elevation secret matched the bound account.
    ElevateGranted { account: String },
    /// Elevation secret did not match the bound account.
    ElevateDenied { account: String },
    /// Directory listing granted on the bound account.
    ListingGranted { account: String },
    /// Event skipped: unbound session or unrecognized kind.
    Ignored { event: String },
}

impl AuthOutcome {
    /// Fieldless discriminant, handy for counting and matching in tests.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Bound { .. } => OutcomeKind::Bound,
            Self::AlreadyBound { .. } => OutcomeKind::AlreadyBound,
            Self::UnknownUser { .. } => OutcomeKind::UnknownUser,
            Self::OccupantConflict { .. } => OutcomeKind::OccupantConflict,
            Self::AccountLocked { .. } => OutcomeKind::AccountLocked,
            Self::BadCredential { .. } => OutcomeKind::BadCredential,
            Self::ElevateGranted { .. } => OutcomeKind::ElevateGranted,
            Self::ElevateDenied { .. } => OutcomeKind::ElevateDenied,
            Self::ListingGranted { .. } => OutcomeKind::ListingGranted,
            Self::Ignored { .. } => OutcomeKind::Ignored,
        }
    }
}

/// Discriminant of [`AuthOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Bound,
    AlreadyBound,
    UnknownUser,
    OccupantConflict,
    AccountLocked,
    BadCredential,
    ElevateGranted,
    ElevateDenied,
    ListingGranted,
    Ignored,
}

impl OutcomeKind {
    /// Every kind, in declaration order.
    pub const ALL: [OutcomeKind; 10] = [
        OutcomeKind::Bound,
        OutcomeKind::AlreadyBound,
        OutcomeKind::UnknownUser,
        OutcomeKind::OccupantConflict,
        OutcomeKind::AccountLocked,
        OutcomeKind::BadCredential,
        OutcomeKind::ElevateGranted,
        OutcomeKind::ElevateDenied,
        OutcomeKind::ListingGranted,
        OutcomeKind::Ignored,
    ];

    /// Snake-case name used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Bound => "bound",
            OutcomeKind::AlreadyBound => "already_bound",
            OutcomeKind::UnknownUser => "unknown_user",
            OutcomeKind::OccupantConflict => "occupant_conflict",
            OutcomeKind::AccountLocked => "account_locked",
            OutcomeKind::BadCredential => "bad_credential",
            OutcomeKind::ElevateGranted => "elevate_granted",
            OutcomeKind::ElevateDenied => "elevate_denied",
            OutcomeKind::ListingGranted => "listing_granted",
            OutcomeKind::Ignored => "ignored",
        }
    }

    /// Position in [`OutcomeKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
