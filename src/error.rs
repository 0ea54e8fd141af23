//! Error types shared across the auth layer.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Backend failures are mapped to a generic
//! user-facing message by [`AuthError::user_message`] and stored on the
//! session; token decode failures degrade to "no role"; storage failures
//! are logged and the in-memory session keeps working.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Check your credentials.";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed.";
pub const SERVER_UNREACHABLE_MESSAGE: &str = "Unable to reach the server. Try again later.";

/// Errors produced by calls to the authentication backend.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("auth request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("auth response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected.
    #[error("auth response parse failed: {0}")]
    Parse(String),

    /// A success response carried no token under any known field.
    #[error("login response did not contain a token")]
    MissingToken,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl AuthError {
    /// Message suitable for display next to a login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.user_message_or(LOGIN_FAILED_MESSAGE)
    }

    /// User-facing message with a caller-chosen generic fallback.
    ///
    /// If the backend returned a JSON body with a `message` field on a
    /// 4xx status, that message is used; transport failures get the
    /// "unreachable" text; everything else collapses to `fallback`.
    #[must_use]
    pub fn user_message_or(&self, fallback: &str) -> String {
        match self {
            Self::Request(_) | Self::HttpClientBuild(_) => SERVER_UNREACHABLE_MESSAGE.to_owned(),
            Self::Status { status: 400..=499, body } => backend_message(body).unwrap_or_else(|| fallback.to_owned()),
            Self::Status { .. } | Self::Parse(_) | Self::MissingToken => fallback.to_owned(),
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value.get("message")?.as_str()?.trim();
    if message.is_empty() { None } else { Some(message.to_owned()) }
}

/// Errors from decoding a bearer token's payload segment.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    Segments(usize),
    #[error("token payload is not valid base64url: {0}")]
    Base64(String),
    #[error("token payload is not valid JSON: {0}")]
    Json(String),
    #[error("token payload has no role claim")]
    MissingRole,
}

/// Errors from durable key-value storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from reading client configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
    #[error("{var} must start with http:// or https://, got {value}")]
    InvalidUrl { var: &'static str, value: String },
}
