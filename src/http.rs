//! Bearer-authorized requests to the clinic API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every CRUD service (appointments, prescriptions, reminders, ...) goes
//! through this client so the stored token is attached uniformly. A 401
//! means the backend no longer accepts the token; the session is logged
//! out so the next navigation lands on the login page.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::auth_client::AuthClient;
use crate::config::ClientConfig;
use crate::error::AuthError;

pub struct AuthorizedHttp {
    http: reqwest::Client,
    config: ClientConfig,
    auth: AuthClient,
}

impl AuthorizedHttp {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: ClientConfig, auth: AuthClient) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config, auth })
    }

    /// `GET` an API path and parse the JSON body.
    ///
    /// # Errors
    ///
    /// See [`AuthorizedHttp::request`].
    pub async fn get_json(&self, path: &str) -> Result<Value, AuthError> {
        self.request(Method::GET, path, None).await
    }

    /// Send a request to `path` with the stored bearer token attached.
    ///
    /// An empty success body yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `Request` on transport failure, `Status` on a non-success
    /// status (logging the session out first on 401, if the rejected token
    /// is still the stored one), or `Parse` when the body is not JSON.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, AuthError> {
        let url = self.config.api_url(path);
        let mut builder = self.http.request(method, url);
        let sent_token = self.auth.tokens().read();
        if let Some(token) = &sent_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| AuthError::Request(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| AuthError::Request(e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // A newer login may have replaced the token while this request was in flight.
            if sent_token.is_some() && self.auth.tokens().read() == sent_token {
                tracing::info!(path, "backend rejected token; logging out");
                self.auth.logout();
            } else {
                tracing::debug!(path, "401 for a token no longer stored; session kept");
            }
        }
        if !status.is_success() {
            return Err(AuthError::Status { status: status.as_u16(), body: text });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Parse(e.to_string()))
    }
}
