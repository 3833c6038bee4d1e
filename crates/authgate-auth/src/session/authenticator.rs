//! Replays a stream's events against the shared directory.
//!
//! A login decision is made under the target account's lock and nothing
//! else. Releasing a previously bound account happens afterwards, under that
//! account's own lock, so no task ever holds two account locks.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use authgate_core::config::{AuthConfig, RebindFailurePolicy};
use authgate_core::types::{AccountId, Event, Stream, StreamId};

use crate::directory::UserDirectory;

use super::outcome::{AuthOutcome, OutcomeKind};
use super::state::Session;

/// Login rules shared by every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginPolicy {
    /// Failures after which an account refuses logins.
    pub lockout_threshold: u32,
    /// Session tracking after a failed login against another account.
    pub rebind_failure: RebindFailurePolicy,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for LoginPolicy {
    fn from(config: &AuthConfig) -> Self {
        Self {
            lockout_threshold: config.lockout_threshold,
            rebind_failure: config.rebind_failure_policy,
        }
    }
}

/// Everything that happened while processing one stream.
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    /// The processed stream.
    pub stream_id: StreamId,
    /// One outcome per event, in event order.
    pub outcomes: Vec<AuthOutcome>,
    /// Account name the session was bound to when the stream ended.
    pub final_account: Option<String>,
}

impl StreamReport {
    /// Outcome kinds in event order.
    pub fn kinds(&self) -> Vec<OutcomeKind> {
        self.outcomes.iter().map(AuthOutcome::kind).collect()
    }

    /// How many events produced the given outcome kind.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.outcomes.iter().filter(|o| o.kind() == kind).count()
    }
}

/// Decision taken under the account lock.
enum LoginDecision {
    AlreadyBound,
    Conflict(StreamId),
    Locked,
    BadCredential(u32),
    Bound,
}

/// Runs streams against a shared [`UserDirectory`].
///
/// The authenticator itself is stateless apart from its handles; each call
/// to [`SessionAuthenticator::run`] owns a fresh [`Session`].
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    directory: Arc<UserDirectory>,
    policy: LoginPolicy,
}

impl SessionAuthenticator {
    /// Create an authenticator over a shared directory.
    pub fn new(directory: Arc<UserDirectory>, policy: LoginPolicy) -> Self {
        Self { directory, policy }
    }

    /// The directory this authenticator works against.
    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    /// Process every event of `stream` in order.
    pub async fn run(&self, stream: &Stream) -> StreamReport {
        let mut session = Session::new(stream.id().clone());
        let mut outcomes = Vec::with_capacity(stream.len());

        for event in stream.events() {
            outcomes.push(self.handle(&mut session, event).await);
        }

        let final_account = session
            .bound()
            .and_then(|id| self.directory.account(id))
            .map(|account| account.name().to_string());

        StreamReport {
            stream_id: stream.id().clone(),
            outcomes,
            final_account,
        }
    }

    /// Apply one event to a session.
    pub async fn handle(&self, session: &mut Session, event: &Event) -> AuthOutcome {
        match event {
            Event::Login {
                actor_name,
                credential,
            } => self.login(session, actor_name, credential).await,
            Event::Elevate { credential } => self.elevate(session, credential),
            Event::ListDirectory => self.list_directory(session),
            Event::Unrecognized { kind } => {
                debug!(
                    stream_id = %session.stream_id(),
                    kind = %kind,
                    "Ignoring unrecognized event"
                );
                AuthOutcome::Ignored {
                    event: kind.clone(),
                }
            }
        }
    }

    async fn login(&self, session: &mut Session, actor_name: &str, credential: &str) -> AuthOutcome {
        let stream_id = session.stream_id().clone();

        let Some(target) = self.directory.lookup_by_name(actor_name) else {
            warn!(
                stream_id = %stream_id,
                name = %actor_name,
                "Couldn't find a user with this name"
            );
            return AuthOutcome::UnknownUser {
                name: actor_name.to_string(),
            };
        };

        let threshold = self.policy.lockout_threshold;
        let decision = self
            .directory
            .with_account_locked(target, |account, state| match &state.occupant {
                Some(holder) if *holder == stream_id => LoginDecision::AlreadyBound,
                Some(holder) => LoginDecision::Conflict(holder.clone()),
                None if state.failure_count >= threshold => LoginDecision::Locked,
                None if !account.secret_matches(credential) => {
                    state.failure_count += 1;
                    LoginDecision::BadCredential(state.failure_count)
                }
                None => {
                    state.occupant = Some(stream_id.clone());
                    state.failure_count = 0;
                    LoginDecision::Bound
                }
            })
            .await;

        let account = actor_name.to_string();
        match decision {
            Some(LoginDecision::AlreadyBound) => {
                if let Some(prior) = session.bind(target) {
                    if prior != target {
                        self.release(prior, &stream_id).await;
                    }
                }
                info!(stream_id = %stream_id, account = %account, "Already logged in");
                AuthOutcome::AlreadyBound { account }
            }
            Some(LoginDecision::Conflict(holder)) => {
                self.after_failed_login(session);
                warn!(
                    stream_id = %stream_id,
                    account = %account,
                    holder = %holder,
                    "User already logged in from another stream"
                );
                AuthOutcome::OccupantConflict { account, holder }
            }
            Some(LoginDecision::Locked) => {
                self.after_failed_login(session);
                warn!(stream_id = %stream_id, account = %account, "User is blocked");
                AuthOutcome::AccountLocked { account }
            }
            Some(LoginDecision::BadCredential(failures)) => {
                self.after_failed_login(session);
                warn!(
                    stream_id = %stream_id,
                    account = %account,
                    failures = failures,
                    "Wrong password"
                );
                AuthOutcome::BadCredential { account, failures }
            }
            Some(LoginDecision::Bound) => {
                if let Some(prior) = session.bind(target) {
                    if prior != target {
                        self.release(prior, &stream_id).await;
                    }
                }
                info!(stream_id = %stream_id, account = %account, "User logged in");
                AuthOutcome::Bound { account }
            }
            None => AuthOutcome::UnknownUser { name: account },
        }
    }

    fn elevate(&self, session: &Session, credential: &str) -> AuthOutcome {
        let Some(account) = session.bound().and_then(|id| self.directory.account(id)) else {
            return AuthOutcome::Ignored {
                event: "sudo".to_string(),
            };
        };

        let name = account.name().to_string();
        if account.secret_matches(credential) {
            info!(stream_id = %session.stream_id(), account = %name, "Accepted sudo");
            AuthOutcome::ElevateGranted { account: name }
        } else {
            warn!(stream_id = %session.stream_id(), account = %name, "Bad password for sudo");
            AuthOutcome::ElevateDenied { account: name }
        }
    }

    fn list_directory(&self, session: &Session) -> AuthOutcome {
        let Some(account) = session.bound().and_then(|id| self.directory.account(id)) else {
            return AuthOutcome::Ignored {
                event: "dir".to_string(),
            };
        };

        let name = account.name().to_string();
        info!(stream_id = %session.stream_id(), account = %name, "Accepted dir");
        AuthOutcome::ListingGranted { account: name }
    }

    fn after_failed_login(&self, session: &mut Session) {
        if self.policy.rebind_failure == RebindFailurePolicy::DropTracking {
            session.unbind();
        }
    }

    /// Clear `prior`'s occupant if it is still this stream.
    async fn release(&self, prior: AccountId, stream_id: &StreamId) {
        let released = self
            .directory
            .with_account_locked(prior, |_, state| {
                if state.occupant.as_ref() == Some(stream_id) {
                    state.occupant = None;
                    true
                } else {
                    false
                }
            })
            .await
            .unwrap_or(false);

        if released {
            debug!(stream_id = %stream_id, account_id = %prior, "Released previous account");
        }
    }
}
