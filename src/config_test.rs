use std::sync::Mutex;

use super::*;

// Env mutation is process-global; every test touching CLINIC_* vars holds this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// # Safety
/// Callers must hold `ENV_LOCK`.
unsafe fn clear_clinic_env() {
    unsafe {
        std::env::remove_var("CLINIC_API_BASE_URL");
        std::env::remove_var("CLINIC_SIGNUP_PATH");
        std::env::remove_var("CLINIC_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("CLINIC_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("CLINIC_STORAGE_PATH");
    }
}

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_clinic_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.login_url(), "http://localhost:8081/api/v1/auth/login");
    assert_eq!(cfg.signup_url(), "http://localhost:8081/api/v1/auth/signup");
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_clinic_env();
        std::env::set_var("CLINIC_API_BASE_URL", "https://clinic.example.test/");
        std::env::set_var("CLINIC_SIGNUP_PATH", "api/v1/auth/register");
        std::env::set_var("CLINIC_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("CLINIC_CONNECT_TIMEOUT_SECS", " 7 ");
        std::env::set_var("CLINIC_STORAGE_PATH", "/tmp/clinic.json");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, "https://clinic.example.test");
    assert_eq!(cfg.signup_url(), "https://clinic.example.test/api/v1/auth/register");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.storage_path, PathBuf::from("/tmp/clinic.json"));

    unsafe { clear_clinic_env() };
}

#[test]
fn from_env_bad_numbers_fall_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_clinic_env();
        std::env::set_var("CLINIC_REQUEST_TIMEOUT_SECS", "soon");
        std::env::set_var("CLINIC_CONNECT_TIMEOUT_SECS", "-1");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts, Timeouts::default());

    unsafe { clear_clinic_env() };
}

#[test]
fn from_env_rejects_empty_base_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_clinic_env();
        std::env::set_var("CLINIC_API_BASE_URL", "  / ");
    }

    let err = ClientConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::Empty { var: "CLINIC_API_BASE_URL" });

    unsafe { clear_clinic_env() };
}

#[test]
fn with_base_url_rejects_non_http_scheme() {
    let err = ClientConfig::default().with_base_url("ftp://files").unwrap_err();
    assert!(err.to_string().contains("must start with http"));
}

#[test]
fn api_url_adds_missing_slash() {
    let cfg = ClientConfig::default().with_base_url("http://api.test/").unwrap();
    assert_eq!(cfg.api_url("api/v1/rendez-vous"), "http://api.test/api/v1/rendez-vous");
    assert_eq!(cfg.api_url("/api/v1/rappels"), "http://api.test/api/v1/rappels");
}
