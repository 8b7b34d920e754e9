use super::*;
use crate::net::api::login_outcome;
use crate::net::types::Role;
use crate::state::session::fakes::{FailingStorage, MemoryStorage};
use crate::state::session::{TOKEN_KEY, USER_KEY};

fn admin() -> SessionUser {
    SessionUser { id: "u1".to_owned(), role: Role::Admin }
}

// =============================================================
// AuthState transitions
// =============================================================

#[test]
fn auth_state_default_is_loading_and_empty() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(state.token.is_none());
    assert!(state.user.is_none());
}

#[test]
fn loaded_clears_loading_and_copies_stored_fields() {
    let stored = StoredSession { token: Some("t".to_owned()), user: Some(admin()) };
    let state = AuthState::default().apply(AuthEvent::Loaded(stored));
    assert!(!state.loading);
    assert_eq!(state.token.as_deref(), Some("t"));
    assert_eq!(state.user, Some(admin()));
}

#[test]
fn login_and_logout_set_token_and_user_together() {
    let loaded = AuthState::default().apply(AuthEvent::Loaded(StoredSession::default()));
    let logged_in = loaded.apply(AuthEvent::LoggedIn { token: "t".to_owned(), user: admin() });
    assert!(logged_in.token.is_some() && logged_in.user.is_some());

    let logged_out = logged_in.apply(AuthEvent::LoggedOut);
    assert!(logged_out.token.is_none() && logged_out.user.is_none());
    assert!(!logged_out.loading);
}

#[test]
fn ready_token_hidden_while_loading() {
    let state = AuthState { token: Some("t".to_owned()), user: None, loading: true };
    assert!(state.ready_token().is_none());
    assert!(!state.is_authenticated());

    let ready = AuthState { loading: false, ..state };
    assert_eq!(ready.ready_token(), Some("t"));
    assert!(ready.is_authenticated());
}

// =============================================================
// AuthController lifecycle
// =============================================================

#[test]
fn controller_is_loading_at_mount() {
    let controller = AuthController::new(MemoryStorage::default());
    assert!(controller.snapshot().loading);
}

#[test]
fn initialize_resolves_loading_for_present_session() {
    let backend = MemoryStorage::default();
    backend.insert(TOKEN_KEY, "t");
    backend.insert(USER_KEY, r#"{"id":"u1","role":"admin"}"#);
    let controller = AuthController::new(backend);
    controller.initialize();

    let state = controller.snapshot();
    assert!(!state.loading);
    assert_eq!(state.token.as_deref(), Some("t"));
    assert_eq!(state.user, Some(admin()));
}

#[test]
fn initialize_resolves_loading_for_absent_session() {
    let controller = AuthController::new(MemoryStorage::default());
    controller.initialize();
    assert_eq!(controller.snapshot(), AuthState { token: None, user: None, loading: false });
}

#[test]
fn initialize_resolves_loading_when_storage_throws() {
    let controller = AuthController::new(FailingStorage);
    controller.initialize();
    assert_eq!(controller.snapshot(), AuthState { token: None, user: None, loading: false });
}

#[test]
fn login_survives_a_new_controller_mount() {
    let backend = MemoryStorage::default();
    let first = AuthController::new(backend.clone());
    first.initialize();
    first.login("t1".to_owned(), admin());

    let second = AuthController::new(backend);
    second.initialize();
    let state = second.snapshot();
    assert_eq!(state.token.as_deref(), Some("t1"));
    assert_eq!(state.user, Some(admin()));
}

#[test]
fn logout_survives_a_new_controller_mount() {
    let backend = MemoryStorage::default();
    let first = AuthController::new(backend.clone());
    first.initialize();
    first.login("t1".to_owned(), admin());
    first.logout();

    let second = AuthController::new(backend);
    second.initialize();
    let state = second.snapshot();
    assert!(state.token.is_none());
    assert!(state.user.is_none());
}

#[test]
fn login_updates_memory_even_when_storage_rejects_write() {
    let controller = AuthController::new(FailingStorage);
    controller.initialize();
    controller.login("t1".to_owned(), admin());
    assert_eq!(controller.snapshot().token.as_deref(), Some("t1"));

    let remount = AuthController::new(FailingStorage);
    remount.initialize();
    assert!(remount.snapshot().token.is_none());
}

#[test]
fn logout_clears_memory_even_when_storage_rejects_removal() {
    let controller = AuthController::new(FailingStorage);
    controller.initialize();
    controller.login("t1".to_owned(), admin());
    controller.logout();
    assert!(controller.snapshot().token.is_none());
}

#[test]
fn all_consumers_observe_the_same_session() {
    let controller = AuthController::new(MemoryStorage::default());
    let page_view = controller.state();
    let guard_view = controller.clone().state();
    controller.initialize();
    controller.login("t1".to_owned(), admin());

    assert_eq!(page_view.get_untracked().token.as_deref(), Some("t1"));
    assert_eq!(guard_view.get_untracked().user, Some(admin()));
}

// =============================================================
// Login responses and logout handles
// =============================================================

#[test]
fn rejected_non_admin_login_persists_nothing() {
    let backend = MemoryStorage::default();
    let controller = AuthController::new(backend.clone());
    controller.initialize();

    let body = r#"{"token":"jwt","user":{"_id":"u2","role":"pro"}}"#;
    let result = controller.complete_login(login_outcome(true, 200, body));

    assert_eq!(result, Err(ApiError::AdminRequired));
    assert_eq!(backend.get(TOKEN_KEY), None);
    assert_eq!(backend.get(USER_KEY), None);
    assert!(controller.snapshot().token.is_none());
}

#[test]
fn admin_login_persists_and_survives_remount() {
    let backend = MemoryStorage::default();
    let controller = AuthController::new(backend.clone());
    controller.initialize();

    let body = r#"{"token":"jwt","user":{"_id":"u1","role":"admin"}}"#;
    assert_eq!(controller.complete_login(login_outcome(true, 200, body)), Ok(()));
    assert_eq!(backend.get(TOKEN_KEY).as_deref(), Some("jwt"));

    let remount = AuthController::new(backend);
    remount.initialize();
    assert_eq!(remount.snapshot().token.as_deref(), Some("jwt"));
    assert_eq!(remount.snapshot().user, Some(admin()));
}

#[test]
fn logout_callback_works_from_nested_closures() {
    let backend = MemoryStorage::default();
    let controller = AuthController::new(backend.clone());
    controller.initialize();
    controller.login("t1".to_owned(), admin());

    let logout = controller.logout_callback();
    // Rebuilt on every render, like a handler inside guarded children.
    let render = move || move || logout.run(());
    render()();
    render()();

    assert!(controller.snapshot().token.is_none());
    assert_eq!(backend.get(TOKEN_KEY), None);
}
