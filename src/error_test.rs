use super::*;

#[test]
fn transport_failure_maps_to_unreachable_message() {
    let err = AuthError::Request("connection refused".into());
    assert_eq!(err.user_message(), SERVER_UNREACHABLE_MESSAGE);
}

#[test]
fn unauthorized_without_body_maps_to_generic_login_message() {
    let err = AuthError::Status { status: 401, body: String::new() };
    assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
}

#[test]
fn client_error_uses_backend_message_when_present() {
    let err = AuthError::Status { status: 400, body: r#"{"message":"Email déjà utilisé"}"#.into() };
    assert_eq!(err.user_message(), "Email déjà utilisé");
}

#[test]
fn blank_backend_message_falls_back() {
    let err = AuthError::Status { status: 403, body: r#"{"message":"   "}"#.into() };
    assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
}

#[test]
fn server_error_body_is_not_shown_to_user() {
    let err = AuthError::Status { status: 500, body: r#"{"message":"NullPointerException"}"#.into() };
    assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
}

#[test]
fn missing_token_maps_to_login_message() {
    assert_eq!(AuthError::MissingToken.user_message(), LOGIN_FAILED_MESSAGE);
}

#[test]
fn status_accessor() {
    assert_eq!(AuthError::Status { status: 401, body: String::new() }.status(), Some(401));
    assert_eq!(AuthError::MissingToken.status(), None);
}

#[test]
fn display_messages_are_lowercase_and_descriptive() {
    assert_eq!(AuthError::Status { status: 502, body: String::new() }.to_string(), "auth response error: status 502");
    assert_eq!(DecodeError::Segments(2).to_string(), "token must have three dot-separated segments, found 2");
}

#[test]
fn custom_fallback_is_used_for_registration() {
    let err = AuthError::Status { status: 409, body: String::new() };
    assert_eq!(err.user_message_or(REGISTER_FAILED_MESSAGE), REGISTER_FAILED_MESSAGE);
}
