//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected layouts and pages apply identical unauthenticated-redirect
//! behavior. The decision is a pure function; the redirect itself runs from
//! an effect observing the decision, never from the render pass.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::config::UnauthorizedPolicy;
use crate::net::api::ApiError;
use crate::state::auth::AuthState;

/// What a protected view should do for the current auth state and path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Initialization pending; show a placeholder and do not navigate.
    Loading,
    /// Navigate to the given path and render nothing.
    Redirect(String),
    /// Render the protected content.
    Render,
}

/// Guard rule over `(loading, token, current_path, login_path)`.
#[must_use]
pub fn guard_decision(loading: bool, token: Option<&str>, current_path: &str, login_path: &str) -> GuardDecision {
    if loading {
        GuardDecision::Loading
    } else if token.is_none() && current_path != login_path {
        GuardDecision::Redirect(login_path.to_owned())
    } else {
        GuardDecision::Render
    }
}

/// [`guard_decision`] for an [`AuthState`].
#[must_use]
pub fn guard_for(state: &AuthState, current_path: &str, login_path: &str) -> GuardDecision {
    guard_decision(state.loading, state.token.as_deref(), current_path, login_path)
}

/// Fires a redirect once per transition into [`GuardDecision::Redirect`].
#[derive(Clone, Debug, Default)]
pub struct RedirectLatch {
    last: Option<GuardDecision>,
}

impl RedirectLatch {
    /// Target to navigate to, if `decision` is a redirect the previous
    /// observation was not already.
    pub fn observe(&mut self, decision: &GuardDecision) -> Option<String> {
        let repeated = self.last.as_ref() == Some(decision);
        self.last = Some(decision.clone());
        match decision {
            GuardDecision::Redirect(to) if !repeated => Some(to.clone()),
            _ => None,
        }
    }
}

/// Reactive guard decision for the current location.
pub fn guard_memo(auth: ReadSignal<AuthState>, path: Memo<String>, login_path: String) -> Memo<GuardDecision> {
    Memo::new(move |_| auth.with(|state| guard_for(state, &path.get(), &login_path)))
}

/// Navigate whenever `decision` becomes a redirect.
pub fn install_unauth_redirect<F>(decision: Memo<GuardDecision>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let latch = StoredValue::new(RedirectLatch::default());
    Effect::new(move || {
        let decision = decision.get();
        let mut target = None;
        latch.update_value(|latch| target = latch.observe(&decision));
        if let Some(to) = target {
            leptos::logging::log!("route guard: redirecting to {to}");
            navigate(&to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Whether an admin page should end the session after `error`.
#[must_use]
pub fn should_force_logout(policy: UnauthorizedPolicy, error: &ApiError) -> bool {
    policy == UnauthorizedPolicy::ForceLogout && error.is_unauthorized()
}
