//! Auth-session state for the current browser tab.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the route guard, REST pages and the realtime page. The controller
//! is created once by the root component and handed out through Leptos
//! context; every consumer reads the same `RwSignal`, so a login or logout is
//! observed by all mounted views without polling.
//!
//! DESIGN
//! ======
//! State changes go through [`AuthState::apply`], a pure transition over
//! [`AuthEvent`]s. The controller only adds write-through to the injected
//! [`SessionStore`] and publishes the next state.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::api::{ApiError, LoginSuccess};
use crate::net::types::SessionUser;
use crate::state::session::{BrowserStorage, KeyValueStore, SessionStore, StoredSession};

/// Authentication state tracking the bearer token, the cached user and
/// whether the initial load from storage is still pending.
///
/// `token` and `user` must not be trusted while `loading` is true.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl Default for AuthState {
    /// A freshly mounted, not yet initialized session.
    fn default() -> Self {
        Self { token: None, user: None, loading: true }
    }
}

/// Inputs that move the session between states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// Initialization finished reading storage.
    Loaded(StoredSession),
    LoggedIn { token: String, user: SessionUser },
    LoggedOut,
}

impl AuthState {
    /// Next state after `event`.
    #[must_use]
    pub fn apply(self, event: AuthEvent) -> Self {
        match event {
            AuthEvent::Loaded(stored) => Self { token: stored.token, user: stored.user, loading: false },
            AuthEvent::LoggedIn { token, user } => Self { token: Some(token), user: Some(user), ..self },
            AuthEvent::LoggedOut => Self { token: None, user: None, ..self },
        }
    }

    /// Token, but only once initialization has resolved.
    #[must_use]
    pub fn ready_token(&self) -> Option<&str> {
        if self.loading { None } else { self.token.as_deref() }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.ready_token().is_some()
    }
}

/// Owner of the in-memory session for one mounted app.
#[derive(Clone)]
pub struct AuthController<S = BrowserStorage> {
    store: SessionStore<S>,
    state: RwSignal<AuthState>,
}

impl<S: KeyValueStore> AuthController<S> {
    /// Mount a controller in the loading state. Call [`Self::initialize`] once.
    pub fn new(backend: S) -> Self {
        Self { store: SessionStore::new(backend), state: RwSignal::new(AuthState::default()) }
    }

    /// Reactive read handle shared by all consumers.
    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    /// Current state without subscribing.
    pub fn snapshot(&self) -> AuthState {
        self.state.get_untracked()
    }

    /// Populate the session from storage and clear `loading`.
    ///
    /// Storage failures are logged by the store and leave the session empty;
    /// `loading` is cleared on every path.
    pub fn initialize(&self) {
        self.state.update(|s| s.loading = true);
        let stored = self.store.load();
        leptos::logging::log!(
            "auth init: token={} user={}",
            stored.token.is_some(),
            stored.user.is_some()
        );
        self.transition(AuthEvent::Loaded(stored));
    }

    /// Write the session through to storage, then publish it.
    ///
    /// A failed write is logged; the in-memory session is still updated and
    /// will not survive a reload.
    pub fn login(&self, token: String, user: SessionUser) {
        if let Err(e) = self.store.save(&token, &user) {
            leptos::logging::error!("auth login: session not persisted: {e}");
        }
        self.transition(AuthEvent::LoggedIn { token, user });
    }

    /// Start a session from a login response. A rejected login leaves both
    /// storage and the in-memory session untouched.
    ///
    /// # Errors
    ///
    /// Returns the rejection unchanged.
    pub fn complete_login(&self, outcome: Result<LoginSuccess, ApiError>) -> Result<(), ApiError> {
        let success = outcome?;
        self.login(success.token, success.user);
        Ok(())
    }

    /// Copyable logout handle for event handlers nested in child closures.
    pub fn logout_callback(&self) -> Callback<()> {
        let auth = self.clone();
        Callback::new(move |()| auth.logout())
    }

    /// Clear storage, then the in-memory session.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            leptos::logging::error!("auth logout: stored session not cleared: {e}");
        }
        self.transition(AuthEvent::LoggedOut);
    }

    fn transition(&self, event: AuthEvent) {
        self.state.update(|state| {
            let current = state.clone();
            *state = current.apply(event);
        });
    }
}
