//! Backend auth endpoints.
//!
//! DESIGN
//! ======
//! `AuthApi` is the seam between the auth client and the network. The
//! production implementation posts JSON with `reqwest`; tests substitute a
//! scripted implementation.
//!
//! The login response shape has varied across backend revisions, so token
//! extraction accepts the token at the top level under several names or
//! nested inside a `user` / `data` object.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::AuthError;

const TOKEN_FIELDS: [&str; 4] = ["token", "accessToken", "access_token", "jwt"];
const NESTED_FIELDS: [&str; 2] = ["user", "data"];

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Login credentials. Transient; never persisted.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "motDePasse")]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration fields as the signup form submits them.
#[derive(Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub mot_de_passe: String,
    pub age: u32,
    pub telephone: String,
    pub adresse: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("nom", &self.nom)
            .field("prenom", &self.prenom)
            .field("email", &self.email)
            .field("mot_de_passe", &"<redacted>")
            .field("age", &self.age)
            .field("telephone", &self.telephone)
            .field("adresse", &self.adresse)
            .finish()
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Trait abstraction over the authentication backend.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on transport failure, non-success status,
    /// unparseable body, or a body without a token.
    async fn login(&self, request: &LoginRequest) -> Result<String, AuthError>;

    /// Create an account. Returns whatever the backend echoes back.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on transport failure or non-success status.
    async fn register(&self, request: &RegisterRequest) -> Result<Value, AuthError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    login_url: String,
    signup_url: String,
}

impl HttpAuthApi {
    /// Build a client for the endpoints in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, login_url: config.login_url(), signup_url: config.signup_url() })
    }

    async fn post_json(&self, url: &str, body: &impl Serialize) -> Result<String, AuthError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(AuthError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<String, AuthError> {
        let text = self.post_json(&self.login_url, request).await?;
        parse_login_response(&text)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Value, AuthError> {
        let text = self.post_json(&self.signup_url, request).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

impl fmt::Debug for HttpAuthApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAuthApi")
            .field("login_url", &self.login_url)
            .field("signup_url", &self.signup_url)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Pull the bearer token out of a login response body.
///
/// # Errors
///
/// Returns `Parse` if the body is not JSON and `MissingToken` if no known
/// field carries a non-empty string.
pub fn parse_login_response(text: &str) -> Result<String, AuthError> {
    let value: Value = serde_json::from_str(text).map_err(|e| AuthError::Parse(e.to_string()))?;
    extract_token(&value).ok_or(AuthError::MissingToken)
}

fn extract_token(value: &Value) -> Option<String> {
    if let Some(token) = value.as_str().map(str::trim).filter(|t| !t.is_empty()) {
        return Some(token.to_owned());
    }
    let object = value.as_object()?;
    let direct = TOKEN_FIELDS
        .iter()
        .filter_map(|field| object.get(*field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|t| !t.is_empty());
    if let Some(token) = direct {
        return Some(token.to_owned());
    }
    NESTED_FIELDS
        .iter()
        .filter_map(|field| object.get(*field))
        .filter(|nested| nested.is_object())
        .find_map(extract_token)
}
