//! Route guard for the admin section.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every `/admin/*` route. Decisions come from `util::auth`; this
//! component only renders them and installs the redirect effect.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::config::ClientConfig;
use crate::state::auth::AuthController;
use crate::util::auth::{GuardDecision, guard_memo, install_unauth_redirect};

/// Render `children` only once the session is known and present (or the
/// current path is the login page).
#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let location = use_location();

    let decision = guard_memo(auth.state(), location.pathname, config.login_path.clone());
    install_unauth_redirect(decision, use_navigate());

    move || match decision.get() {
        GuardDecision::Loading => view! { <div class="route-guard__loading">"Loading..."</div> }.into_any(),
        GuardDecision::Redirect(_) => ().into_any(),
        GuardDecision::Render => children().into_any(),
    }
}
