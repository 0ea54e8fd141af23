//! Pre-navigation route guard.
//!
//! The guard is a pure predicate over the token store: it never mutates
//! session state and never caches a decision. Each navigation re-reads the
//! stored token and re-decodes its role.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::fmt::Write as _;
use std::sync::Arc;

use crate::claims::{Role, role_of};
use crate::routes::{LOGIN_ROUTE, RouteRule, RouteTable, UNAUTHORIZED_ROUTE};
use crate::token_store::TokenStore;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No session; send the user to login and come back afterwards.
    RedirectToLogin { return_url: String },
    /// Session present but its role is not permitted here.
    RedirectToUnauthorized,
}

impl GuardDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// URL the router should navigate to instead, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin { return_url } => {
                Some(format!("{LOGIN_ROUTE}?returnUrl={}", encode_query_value(return_url)))
            }
            Self::RedirectToUnauthorized => Some(UNAUTHORIZED_ROUTE.to_owned()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    tokens: TokenStore,
    routes: Arc<RouteTable>,
}

impl RouteGuard {
    pub fn new(tokens: TokenStore, routes: Arc<RouteTable>) -> Self {
        Self { tokens, routes }
    }

    /// Decide whether navigation to `url`, protected by `rule`, may proceed.
    #[must_use]
    pub fn check(&self, rule: &RouteRule, url: &str) -> GuardDecision {
        let Some(token) = self.tokens.read() else {
            tracing::debug!(url, "guard: no token, redirecting to login");
            return GuardDecision::RedirectToLogin { return_url: url.to_owned() };
        };

        if !rule.required_roles().is_empty() {
            let role = role_of(&token).and_then(|r| Role::parse(&r));
            if !rule.permits(role.as_ref()) {
                tracing::debug!(url, role = ?role, "guard: role not permitted");
                return GuardDecision::RedirectToUnauthorized;
            }
        }

        GuardDecision::Allow
    }

    /// Resolve the rule for `url` from the route table, then check it.
    /// Public routes are always allowed.
    #[must_use]
    pub fn check_url(&self, url: &str) -> GuardDecision {
        match self.routes.rule_for(url) {
            None => GuardDecision::Allow,
            Some(rule) => self.check(rule, url),
        }
    }
}

/// Percent-encode a query value, leaving path characters readable so a
/// return URL like `/admin/dashboard` survives verbatim.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' | b':' | b'@' => {
                out.push(char::from(byte));
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
