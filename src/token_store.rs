//! Bearer token persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token store is the single source of truth the route guard reads on
//! every navigation. It does not enforce expiry; a stale token surfaces as
//! a 401 from the backend (see `http`) or via `AuthClient::expire_if_stale`.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::sync::Arc;

use crate::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "jwtToken";
pub const ROLES_KEY: &str = "userRoles";

/// Token + roles persisted in durable key-value storage.
///
/// Cheap to clone; clones share the same underlying storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Write `token`, overwriting any prior value.
    pub fn save(&self, token: &str) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            tracing::warn!(error = %e, "failed to persist token");
        }
    }

    /// Current token, if one is stored and non-empty.
    #[must_use]
    pub fn read(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    /// Remove the token and the roles entry.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, ROLES_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(error = %e, key, "failed to clear stored credential");
            }
        }
    }

    /// Persist the role list as a JSON array.
    pub fn save_roles(&self, roles: &[String]) {
        let raw = match serde_json::to_string(roles) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode roles");
                return;
            }
        };
        if let Err(e) = self.storage.set(ROLES_KEY, &raw) {
            tracing::warn!(error = %e, "failed to persist roles");
        }
    }

    /// Stored role list; empty when absent or unreadable.
    #[must_use]
    pub fn read_roles(&self) -> Vec<String> {
        self.storage
            .get(ROLES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_token", &self.read().is_some())
            .finish_non_exhaustive()
    }
}
