//! Static route authorization rules and role landing pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mirrors the web client's router configuration: which path prefixes are
//! public, which need any session, and which need a specific role. The
//! guard consults this table; the auth client uses it to pick a landing
//! page after login.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::collections::{BTreeMap, BTreeSet};

use crate::claims::Role;

pub const LOGIN_ROUTE: &str = "/auth";
pub const LOGIN_PAGE: &str = "/auth/login";
pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";
pub const HOME_ROUTE: &str = "/";

/// Roles a protected route requires. Empty means "any authenticated user".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRule {
    required_roles: BTreeSet<Role>,
}

impl RouteRule {
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self { required_roles: roles.into_iter().collect() }
    }

    /// Build from role strings as they appear in route config
    /// (`"ADMIN"` or `"ROLE_ADMIN"`). Blank entries are ignored.
    #[must_use]
    pub fn from_names(names: &[&str]) -> Self {
        Self::roles(names.iter().filter_map(|n| Role::parse(n)))
    }

    #[must_use]
    pub fn required_roles(&self) -> &BTreeSet<Role> {
        &self.required_roles
    }

    /// Whether a session holding `role` satisfies this rule.
    #[must_use]
    pub fn permits(&self, role: Option<&Role>) -> bool {
        if self.required_roles.is_empty() {
            return true;
        }
        role.is_some_and(|r| self.required_roles.contains(r))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Protected(RouteRule),
}

/// Prefix-matched route table with per-role landing pages.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<(String, RouteAccess)>,
    fallback: RouteAccess,
    landings: BTreeMap<Role, String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::clinic()
    }
}

impl RouteTable {
    /// Empty table; unmatched paths get `fallback`.
    #[must_use]
    pub fn new(fallback: RouteAccess) -> Self {
        Self { entries: Vec::new(), fallback, landings: BTreeMap::new() }
    }

    /// Routes of the clinic web client.
    ///
    /// Unlisted paths fall under the authenticated main layout.
    #[must_use]
    pub fn clinic() -> Self {
        Self::new(RouteAccess::Protected(RouteRule::authenticated()))
            .public(LOGIN_ROUTE)
            .public(UNAUTHORIZED_ROUTE)
            .public("/crypto-ico-landing")
            .protected("/pages", RouteRule::authenticated())
            .protected("/admin", RouteRule::roles([Role::Admin]))
            .protected("/medecin", RouteRule::roles([Role::Medecin]))
            .protected("/patient", RouteRule::roles([Role::Patient]))
            .landing(Role::Admin, "/admin/dashboard")
            .landing(Role::Medecin, "/medecin/dashboard")
            .landing(Role::Patient, "/patient/dashboard")
    }

    #[must_use]
    pub fn public(mut self, prefix: &str) -> Self {
        self.entries.push((normalize_prefix(prefix), RouteAccess::Public));
        self
    }

    #[must_use]
    pub fn protected(mut self, prefix: &str, rule: RouteRule) -> Self {
        self.entries.push((normalize_prefix(prefix), RouteAccess::Protected(rule)));
        self
    }

    #[must_use]
    pub fn landing(mut self, role: Role, path: &str) -> Self {
        self.landings.insert(role, path.to_owned());
        self
    }

    /// Access rule for `url`; the longest matching prefix wins.
    #[must_use]
    pub fn access_for(&self, url: &str) -> &RouteAccess {
        let path = path_of(url);
        self.entries
            .iter()
            .filter(|(prefix, _)| prefix_matches(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(&self.fallback, |(_, access)| access)
    }

    /// Rule for `url`, or `None` when the route is public.
    #[must_use]
    pub fn rule_for(&self, url: &str) -> Option<&RouteRule> {
        match self.access_for(url) {
            RouteAccess::Public => None,
            RouteAccess::Protected(rule) => Some(rule),
        }
    }

    /// Dashboard for `role`; unknown or missing roles land on the
    /// unauthorized page.
    #[must_use]
    pub fn landing_for(&self, role: Option<&Role>) -> &str {
        role.and_then(|r| self.landings.get(r))
            .map_or(UNAUTHORIZED_ROUTE, String::as_str)
    }
}

/// Path component of a navigation URL (query and fragment stripped).
#[must_use]
pub fn path_of(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    if path.is_empty() { HOME_ROUTE } else { path }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    let path = path.trim_end_matches('/');
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}
