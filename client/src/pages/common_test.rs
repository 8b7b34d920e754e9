use super::*;
use crate::net::types::{Role, SessionUser};
use crate::state::session::fakes::MemoryStorage;

fn signed_in() -> AuthController<MemoryStorage> {
    let auth = AuthController::new(MemoryStorage::default());
    auth.initialize();
    auth.login("jwt".to_owned(), SessionUser { id: "u1".to_owned(), role: Role::Admin });
    auth
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized { status: 403, message: "Unauthorized or Forbidden accessing users.".to_owned() }
}

#[test]
fn load_starts_pending() {
    assert_eq!(Load::<Vec<u8>>::default(), Load::Pending);
}

#[test]
fn display_only_policy_keeps_session_on_unauthorized() {
    let auth = signed_in();
    let text = api_failure("users", &unauthorized(), &auth, UnauthorizedPolicy::DisplayOnly);
    assert_eq!(text, "Unauthorized or Forbidden accessing users.");
    assert_eq!(auth.snapshot().token.as_deref(), Some("jwt"));
}

#[test]
fn force_logout_policy_ends_session_on_unauthorized() {
    let auth = signed_in();
    api_failure("users", &unauthorized(), &auth, UnauthorizedPolicy::ForceLogout);
    assert!(auth.snapshot().token.is_none());
}

#[test]
fn force_logout_policy_ignores_other_failures() {
    let auth = signed_in();
    let error = ApiError::Server { status: 500, message: "HTTP error! status: 500".to_owned() };
    let text = api_failure("users", &error, &auth, UnauthorizedPolicy::ForceLogout);
    assert_eq!(text, "HTTP error! status: 500");
    assert!(auth.snapshot().token.is_some());
}
