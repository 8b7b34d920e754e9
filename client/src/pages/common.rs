//! Load lifecycle shared by the data pages.
//!
//! ERROR HANDLING
//! ==============
//! Every failed REST call goes through [`api_failure`]: it logs, applies the
//! configured [`UnauthorizedPolicy`] and returns the display text.

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;

use std::future::Future;

use leptos::prelude::*;

use crate::config::UnauthorizedPolicy;
use crate::net::api::ApiError;
use crate::state::auth::{AuthController, AuthState};
use crate::state::session::KeyValueStore;
use crate::util::auth::should_force_logout;

/// Async data slot for one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Load<T> {
    #[default]
    Pending,
    Failed(String),
    Ready(T),
}

/// Bearer token once auth initialization has resolved.
pub fn ready_token(auth: ReadSignal<AuthState>) -> Memo<Option<String>> {
    Memo::new(move |_| auth.with(|state| state.ready_token().map(str::to_owned)))
}

/// Log a REST failure, end the session if policy says so, and return the text
/// to display.
pub fn api_failure<S: KeyValueStore>(
    context: &str,
    error: &ApiError,
    auth: &AuthController<S>,
    policy: UnauthorizedPolicy,
) -> String {
    leptos::logging::error!("{context}: {error}");
    if should_force_logout(policy, error) {
        leptos::logging::warn!("{context}: ending session after {error}");
        auth.logout();
    }
    error.to_string()
}

/// Run `fetch` in the browser and publish its outcome into `target`.
pub fn load_into<T, Fut>(
    target: RwSignal<Load<T>>,
    context: &'static str,
    auth: AuthController,
    policy: UnauthorizedPolicy,
    fetch: Fut,
) where
    T: Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    target.set(Load::Pending);
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let next = match fetch.await {
            Ok(value) => Load::Ready(value),
            Err(e) => Load::Failed(api_failure(context, &e, &auth, policy)),
        };
        target.set(next);
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (context, auth, policy, fetch);
    }
}

/// Placeholder shown while a page's data is loading.
#[component]
pub fn PageLoading(#[prop(into)] text: String) -> impl IntoView {
    view! { <div class="page-status">{text}</div> }
}

/// Error line for a failed load.
#[component]
pub fn PageError(message: String) -> impl IntoView {
    view! { <div class="page-status page-status--error">"Error: " {message}</div> }
}
