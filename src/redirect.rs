//! Explicit "send to login when logged out" subscription.
//!
//! SYSTEM CONTEXT
//! ==============
//! Installed once at startup. Every protected screen gets the same
//! behavior without each one watching the session itself.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use tokio::task::JoinHandle;

use crate::routes::LOGIN_ROUTE;
use crate::session::{Session, SessionState};

/// True when a change from `previous` to `current` should send the user to
/// the login page: the session was authenticated and no longer is.
#[must_use]
pub fn should_redirect_unauth(previous: &Session, current: &Session) -> bool {
    previous.is_authenticated() && !current.is_authenticated() && !current.loading
}

/// Spawn a task calling `navigate(LOGIN_ROUTE)` whenever the session goes
/// from authenticated to anonymous (logout, 401, expiry).
///
/// The task ends when every `SessionState` handle has been dropped.
pub fn spawn_unauth_redirect<F>(session: &SessionState, navigate: F) -> JoinHandle<()>
where
    F: Fn(&str) + Send + 'static,
{
    let mut rx = session.subscribe();
    let mut previous = rx.borrow_and_update().clone();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().clone();
            if should_redirect_unauth(&previous, &current) {
                tracing::debug!("session ended; redirecting to login");
                navigate(LOGIN_ROUTE);
            }
            previous = current;
        }
    })
}
