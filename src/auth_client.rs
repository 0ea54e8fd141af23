//! Login, registration and logout orchestration.
//!
//! DESIGN
//! ======
//! The auth client is the only writer of session state. Each call issues
//! exactly one backend request; concurrent calls are not deduplicated and
//! the last response to resolve overwrites the session.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures are recorded on the session as a user-facing message
//! and also returned, so callers that don't observe the session (the CLI)
//! can still report them. Nothing here panics on a bad response.

#[cfg(test)]
#[path = "auth_client_test.rs"]
mod auth_client_test;

use std::sync::Arc;

use crate::api::{AuthApi, LoginRequest, RegisterRequest};
use crate::claims::{Role, decode_claims, role_of};
use crate::error::{AuthError, REGISTER_FAILED_MESSAGE};
use crate::guard::RouteGuard;
use crate::routes::{LOGIN_PAGE, LOGIN_ROUTE, RouteTable};
use crate::session::SessionState;
use crate::token_store::TokenStore;

#[derive(Clone)]
pub struct AuthClient {
    api: Arc<dyn AuthApi>,
    tokens: TokenStore,
    session: SessionState,
    routes: Arc<RouteTable>,
}

impl AuthClient {
    /// Build a client. If the token store already holds a token, the
    /// session starts authenticated with the role decoded from it.
    pub fn new(api: Arc<dyn AuthApi>, tokens: TokenStore, routes: Arc<RouteTable>) -> Self {
        let session = match tokens.read() {
            Some(token) => {
                let role = role_of(&token).and_then(|r| Role::parse(&r));
                SessionState::restored(token, role)
            }
            None => SessionState::new(),
        };
        Self { api, tokens, session, routes }
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Route guard over this client's token store and route table.
    #[must_use]
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.tokens.clone(), Arc::clone(&self.routes))
    }

    /// Authenticate with the backend.
    ///
    /// On success the token is persisted, the session becomes
    /// authenticated, and the role's landing route is returned.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording its user-facing message
    /// on the session. The token store is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.session.begin_request();
        let request = LoginRequest::new(email, password);

        match self.api.login(&request).await {
            Ok(token) => {
                let raw_role = role_of(&token);
                self.tokens.save(&token);
                let roles: Vec<String> = raw_role.iter().cloned().collect();
                self.tokens.save_roles(&roles);
                let role = raw_role.as_deref().and_then(Role::parse);
                tracing::info!(role = ?role, "login succeeded");
                self.session.authenticated(token, role.clone());
                Ok(self.routes.landing_for(role.as_ref()).to_owned())
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.session.failed(e.user_message());
                Err(e)
            }
        }
    }

    /// Create an account. On success returns the route to navigate to
    /// (the login page).
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording its user-facing message
    /// on the session.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, AuthError> {
        self.session.begin_request();
        match self.api.register(request).await {
            Ok(_) => {
                tracing::info!("registration succeeded");
                self.session.registered();
                Ok(LOGIN_PAGE.to_owned())
            }
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                self.session.failed(e.user_message_or(REGISTER_FAILED_MESSAGE));
                Err(e)
            }
        }
    }

    /// Clear the stored token and reset the session. No network call.
    pub fn logout(&self) {
        self.tokens.clear();
        self.session.reset();
        tracing::info!("logged out");
    }

    /// Role decoded fresh from the stored token.
    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.tokens
            .read()
            .and_then(|t| role_of(&t))
            .and_then(|r| Role::parse(&r))
    }

    /// Role-specific dashboard for the current token.
    #[must_use]
    pub fn landing_route(&self) -> String {
        self.routes.landing_for(self.current_role().as_ref()).to_owned()
    }

    /// Where to go after a successful login: the remembered `returnUrl`
    /// when the guard would allow it, otherwise the role's landing route.
    #[must_use]
    pub fn post_login_route(&self, return_url: Option<&str>) -> String {
        let remembered = return_url
            .map(str::trim)
            .filter(|u| u.starts_with('/') && !u.starts_with("//"))
            .filter(|u| !is_login_route(u));
        match remembered {
            Some(url) if self.guard().check_url(url).is_allowed() => url.to_owned(),
            _ => self.landing_route(),
        }
    }

    /// Log out if the stored token's `exp` is at or before `now` (unix
    /// seconds). Returns whether the session was expired.
    pub fn expire_if_stale(&self, now: i64) -> bool {
        let Some(token) = self.tokens.read() else {
            return false;
        };
        let expired = decode_claims(&token).is_ok_and(|c| c.is_expired(now));
        if expired {
            tracing::info!("stored token expired");
            self.logout();
        }
        expired
    }
}

fn is_login_route(url: &str) -> bool {
    let path = crate::routes::path_of(url);
    path == LOGIN_ROUTE || path.starts_with("/auth/")
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("tokens", &self.tokens)
            .field("session", &self.session.snapshot().is_authenticated())
            .finish_non_exhaustive()
    }
}
