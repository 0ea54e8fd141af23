//! Bearer token claim extraction.
//!
//! DESIGN
//! ======
//! The payload segment is decoded WITHOUT verifying the signature. The
//! backend issued the token and re-validates it on every API call; the
//! client only uses the role to pick pages and gate navigation.
//!
//! Claims are recomputed from the stored token on each read and never
//! cached, so a token replaced by a new login is picked up immediately.

#[cfg(test)]
#[path = "claims_test.rs"]
mod claims_test;

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde_json::Value;

use crate::error::DecodeError;

// =============================================================================
// ROLE
// =============================================================================

/// Application role carried in the token's `role` claim.
///
/// The backend writes Spring-style `ROLE_ADMIN`; route rules may be
/// written as bare `ADMIN`. Both parse to the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    Medecin,
    Patient,
    Other(String),
}

impl Role {
    /// Parse a role string. Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match bare {
            "" => None,
            "ADMIN" => Some(Self::Admin),
            "MEDECIN" => Some(Self::Medecin),
            "PATIENT" => Some(Self::Patient),
            other => Some(Self::Other(other.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::Medecin => "MEDECIN",
            Self::Patient => "PATIENT",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

/// Claims the client cares about, decoded from the token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Raw role string as issued (e.g. `ROLE_PATIENT`).
    pub role: String,
    /// Numeric user id, from `id` or a numeric `sub`.
    pub subject_id: Option<i64>,
    /// The `sub` claim verbatim (usually the email).
    pub subject: Option<String>,
    /// Expiry as unix seconds.
    pub expires_at: Option<i64>,
}

impl Claims {
    #[must_use]
    pub fn parsed_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// True when an `exp` claim exists and is at or before `now` (unix seconds).
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Decode the payload segment of `token` into [`Claims`].
///
/// # Errors
///
/// Returns a [`DecodeError`] when the token is not three segments, the
/// payload is not base64url JSON, or no role claim is present.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let payload = decode_payload(token)?;

    let role = payload
        .get("role")
        .and_then(Value::as_str)
        .or_else(|| {
            payload
                .get("roles")
                .and_then(Value::as_array)
                .and_then(|roles| roles.first())
                .and_then(Value::as_str)
        })
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(DecodeError::MissingRole)?
        .to_owned();

    let subject = payload.get("sub").and_then(Value::as_str).map(str::to_owned);
    let subject_id = payload
        .get("id")
        .and_then(value_as_i64)
        .or_else(|| payload.get("sub").and_then(value_as_i64));
    let expires_at = payload.get("exp").and_then(value_as_i64);

    Ok(Claims { role, subject_id, subject, expires_at })
}

/// Role claim of `token`, or `None` on any decode failure.
///
/// Never panics; failures are logged at `warn`.
#[must_use]
pub fn role_of(token: &str) -> Option<String> {
    match decode_claims(token) {
        Ok(claims) => Some(claims.role),
        Err(e) => {
            tracing::warn!(error = %e, "could not extract role from token");
            None
        }
    }
}

/// Numeric subject id of `token`, or `None` if absent or undecodable.
#[must_use]
pub fn subject_id_of(token: &str) -> Option<i64> {
    match decode_claims(token) {
        Ok(claims) => claims.subject_id,
        Err(e) => {
            tracing::warn!(error = %e, "could not extract subject id from token");
            None
        }
    }
}

fn decode_payload(token: &str) -> Result<Value, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Segments(segments.len()));
    }
    let encoded = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded))
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::Json("payload is not an object".to_owned()));
    }
    Ok(value)
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
