//! # clinic-auth
//!
//! Session and authorization core for the clinic management web client.
//!
//! DESIGN
//! ======
//! Components are layered leaf-first:
//!
//! - `storage`: durable key-value storage (in-memory or JSON file).
//! - `token_store`: bearer token + roles persisted in that storage.
//! - `claims`: unverified decode of the token payload (role, subject, expiry).
//! - `session`: observable session state published over a `watch` channel.
//! - `api`: the backend login/register seam and its `reqwest` implementation.
//! - `auth_client`: login/register/logout orchestration.
//! - `routes` + `guard`: static route rules and the pre-navigation check.
//! - `http`: bearer-authorized requests with 401-driven logout.
//! - `redirect`: explicit "navigate to login when logged out" subscription.

pub mod api;
pub mod auth_client;
pub mod claims;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod redirect;
pub mod routes;
pub mod session;
pub mod storage;
pub mod token_store;

#[cfg(test)]
mod test_support;

pub use api::{AuthApi, HttpAuthApi, LoginRequest, RegisterRequest};
pub use auth_client::AuthClient;
pub use claims::{Claims, Role, role_of};
pub use config::ClientConfig;
pub use error::AuthError;
pub use guard::{GuardDecision, RouteGuard};
pub use routes::{RouteRule, RouteTable};
pub use session::{Session, SessionState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use token_store::TokenStore;
