//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_LOGIN_PATH: &str = "/api/v1/auth/login";
pub const DEFAULT_SIGNUP_PATH: &str = "/api/v1/auth/signup";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_PATH: &str = ".clinic-auth/storage.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub login_path: String,
    pub signup_path: String,
    pub timeouts: Timeouts,
    pub storage_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            signup_path: DEFAULT_SIGNUP_PATH.to_owned(),
            timeouts: Timeouts::default(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CLINIC_API_BASE_URL`: default `http://localhost:8081`
    /// - `CLINIC_SIGNUP_PATH`: default `/api/v1/auth/signup` (some backends use `/api/v1/auth/register`)
    /// - `CLINIC_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CLINIC_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CLINIC_STORAGE_PATH`: default `.clinic-auth/storage.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var("CLINIC_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = normalize_base_url("CLINIC_API_BASE_URL", &base)?;
        let signup_path = std::env::var("CLINIC_SIGNUP_PATH")
            .ok()
            .map(|p| normalize_path(&p))
            .filter(|p| p.len() > 1)
            .unwrap_or_else(|| DEFAULT_SIGNUP_PATH.to_owned());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CLINIC_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CLINIC_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let storage_path = std::env::var("CLINIC_STORAGE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        Ok(Self { api_base_url, login_path: DEFAULT_LOGIN_PATH.to_owned(), signup_path, timeouts, storage_path })
    }

    /// Override the base URL, applying the same validation as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is empty or not an http(s) URL.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url("CLINIC_API_BASE_URL", base)?;
        Ok(self)
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.login_path)
    }

    #[must_use]
    pub fn signup_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.signup_path)
    }

    /// Join an API path (with or without a leading `/`) onto the base URL.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, normalize_path(path))
    }
}

fn normalize_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl { var, value: trimmed.to_owned() });
    }
    Ok(trimmed.to_owned())
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
