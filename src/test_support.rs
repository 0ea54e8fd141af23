//! Helpers shared by unit tests.

use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::api::{AuthApi, LoginRequest, RegisterRequest};
use crate::error::AuthError;

/// Build an unsigned token whose payload is `payload`.
pub fn token_with(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

pub fn token_for_role(role: &str) -> String {
    token_with(&serde_json::json!({ "sub": "a@b.com", "role": role, "id": 7 }))
}

/// Scripted backend: pops one queued outcome per call and records requests.
#[derive(Default)]
pub struct ScriptedApi {
    pub logins: Mutex<Vec<Result<String, AuthError>>>,
    pub registrations: Mutex<Vec<Result<serde_json::Value, AuthError>>>,
    pub login_requests: Mutex<Vec<LoginRequest>>,
    pub register_requests: Mutex<Vec<RegisterRequest>>,
}

impl ScriptedApi {
    pub fn with_login(outcome: Result<String, AuthError>) -> Arc<Self> {
        let api = Self::default();
        api.logins.lock().unwrap().push(outcome);
        Arc::new(api)
    }

    pub fn with_registration(outcome: Result<serde_json::Value, AuthError>) -> Arc<Self> {
        let api = Self::default();
        api.registrations.lock().unwrap().push(outcome);
        Arc::new(api)
    }
}

#[async_trait::async_trait]
impl AuthApi for ScriptedApi {
    async fn login(&self, request: &LoginRequest) -> Result<String, AuthError> {
        self.login_requests.lock().unwrap().push(request.clone());
        let mut logins = self.logins.lock().unwrap();
        if logins.is_empty() { Err(AuthError::Request("no scripted response".into())) } else { logins.remove(0) }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, AuthError> {
        self.register_requests.lock().unwrap().push(request.clone());
        let mut registrations = self.registrations.lock().unwrap();
        if registrations.is_empty() {
            Err(AuthError::Request("no scripted response".into()))
        } else {
            registrations.remove(0)
        }
    }
}
