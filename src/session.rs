//! Observable session state.
//!
//! DESIGN
//! ======
//! A single `watch` channel holds the current [`Session`] snapshot.
//! `SessionState` is an explicit handle passed to whoever needs it; reads
//! take a snapshot, reactions subscribe for change notifications. Only the
//! auth client (login/register/logout/expiry) mutates it, so mutators are
//! crate-private.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::claims::Role;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful.";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful.";

/// Snapshot of the current authentication status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    /// Only meaningful while `token` is present.
    pub role: Option<Role>,
    pub loading: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared handle to the session. Clones observe and mutate the same state.
#[derive(Clone, Debug)]
pub struct SessionState {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Empty (anonymous) session.
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(Session::default())
    }

    /// Session restored from a previously persisted token.
    #[must_use]
    pub fn restored(token: String, role: Option<Role>) -> Self {
        Self::with_session(Session { token: Some(token), role, ..Session::default() })
    }

    fn with_session(session: Session) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.tx.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.tx.borrow().error.clone()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.tx.borrow().role.clone()
    }

    /// Receiver notified on every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    // =========================================================================
    // MUTATIONS (auth client only)
    // =========================================================================

    pub(crate) fn begin_request(&self) {
        self.tx.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.success_message = None;
        });
    }

    pub(crate) fn authenticated(&self, token: String, role: Option<Role>) {
        self.tx.send_modify(|s| {
            s.token = Some(token);
            s.role = role;
            s.loading = false;
            s.error = None;
            s.success_message = Some(LOGIN_SUCCESS_MESSAGE.to_owned());
        });
    }

    /// Record a failed request. An existing token is left as-is.
    pub(crate) fn failed(&self, message: String) {
        self.tx.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
            s.success_message = None;
        });
    }

    pub(crate) fn registered(&self) {
        self.tx.send_modify(|s| {
            s.loading = false;
            s.error = None;
            s.success_message = Some(REGISTER_SUCCESS_MESSAGE.to_owned());
        });
    }

    pub(crate) fn reset(&self) {
        self.tx.send_replace(Session::default());
    }
}
