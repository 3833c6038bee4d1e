//! Session state owned by the task processing one stream.

use authgate_core::types::{AccountId, StreamId};

/// Binding state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No account is tracked.
    Unbound,
    /// The stream is logged into this account.
    Bound(AccountId),
}

/// Ephemeral per-stream session. Never shared, so it needs no lock.
#[derive(Debug, Clone)]
pub struct Session {
    stream_id: StreamId,
    state: SessionState,
}

impl Session {
    /// Start an unbound session for a stream.
    pub fn new(stream_id: StreamId) -> Self {
        Self {
            stream_id,
            state: SessionState::Unbound,
        }
    }

    /// Id of the stream this session belongs to.
    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The bound account, if any.
    pub fn bound(&self) -> Option<AccountId> {
        match self.state {
            SessionState::Bound(id) => Some(id),
            SessionState::Unbound => None,
        }
    }

    /// Bind to `account`, returning the previously bound account.
    pub(crate) fn bind(&mut self, account: AccountId) -> Option<AccountId> {
        let prior = self.bound();
        self.state = SessionState::Bound(account);
        prior
    }

    /// Forget any binding.
    pub(crate) fn unbind(&mut self) {
        self.state = SessionState::Unbound;
    }
}
