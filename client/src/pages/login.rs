//! Admin login page (email + password).
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered inside the admin route guard, which lets the login path through
//! without a session. Only admin accounts are accepted; anything else is
//! rejected before the session store is touched.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::state::auth::AuthController;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let email_value = email.get_untracked().trim().to_owned();
        let password_value = password.get_untracked();
        if email_value.is_empty() || password_value.is_empty() {
            error.set(Some("Enter both email and password.".to_owned()));
            return;
        }
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let auth = auth.clone();
            let config = config.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let outcome = crate::net::api::login(&config, &email_value, &password_value).await;
                match auth.complete_login(outcome) {
                    Ok(()) => navigate(&config.post_login_path, NavigateOptions::default()),
                    Err(e) => {
                        leptos::logging::error!("admin login: {e}");
                        error.set(Some(e.to_string()));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&auth, &config, &navigate, NavigateOptions::default());
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Admin Login"</h1>
                <form class="login-form" on:submit=on_submit>
                    <Show when=move || error.get().is_some()>
                        <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <label class="login-label" for="email">"Email address"</label>
                    <input
                        id="email"
                        class="login-input"
                        type="email"
                        autocomplete="email"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                    <label class="login-label" for="password">"Password"</label>
                    <input
                        id="password"
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Logging in..." } else { "Log In" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
