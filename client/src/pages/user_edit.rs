//! Edit one user's role and name.
//!
//! The form works on a [`UserUpdatePayload`] seeded from the loaded record;
//! missing names are sent as empty strings. A successful save replaces the
//! record with the server's response.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

#[cfg(feature = "hydrate")]
use super::common::api_failure;
use super::common::{Load, PageError, PageLoading, load_into, ready_token};
use crate::config::ClientConfig;
use crate::net::api;
use crate::net::types::{Role, UserEditData, UserUpdatePayload};
use crate::state::auth::AuthController;
use crate::util::time::format_timestamp;

const SAVE_SUCCESS: &str = "User details updated successfully!";

#[component]
pub fn UserEditPage() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let params = use_params_map();
    let user_id = Memo::new(move |_| params.read().get("id").unwrap_or_default());
    let token = ready_token(auth.state());

    let record = RwSignal::new(Load::<UserEditData>::Pending);
    let form = RwSignal::new(None::<UserUpdatePayload>);
    let saving = RwSignal::new(false);
    let banner = RwSignal::new(None::<String>);
    let save_error = RwSignal::new(None::<String>);

    let load_auth = auth.clone();
    let load_config = config.clone();
    Effect::new(move || {
        let Some(token) = token.get() else {
            return;
        };
        let id = user_id.get();
        if id.is_empty() {
            record.set(Load::Failed("User ID not found in URL.".to_owned()));
            return;
        }
        banner.set(None);
        let config = load_config.clone();
        let policy = config.unauthorized_policy;
        load_into(record, "fetch user", load_auth.clone(), policy, async move {
            api::fetch_user(&config, Some(&token), &id).await
        });
    });

    Effect::new(move || {
        if let Load::Ready(user) = record.get() {
            form.set(Some(UserUpdatePayload::from(&user)));
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let (Some(token), Some(payload)) = (token.get_untracked(), form.get_untracked()) else {
            save_error.set(Some("Cannot save. User data or authentication missing.".to_owned()));
            return;
        };
        saving.set(true);
        banner.set(None);
        save_error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let auth = auth.clone();
            let config = config.clone();
            let id = user_id.get_untracked();
            leptos::task::spawn_local(async move {
                match api::update_user(&config, Some(&token), &id, &payload).await {
                    Ok(updated) => {
                        record.set(Load::Ready(updated));
                        banner.set(Some(SAVE_SUCCESS.to_owned()));
                    }
                    Err(e) => {
                        save_error.set(Some(api_failure("update user", &e, &auth, config.unauthorized_policy)));
                    }
                }
                saving.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&auth, &config, token, payload);
        }
    };

    let edit = move |apply: fn(&mut UserUpdatePayload, String)| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            form.update(|f| {
                if let Some(f) = f.as_mut() {
                    apply(f, value);
                }
            });
        }
    };

    view! {
        <div class="admin-page">
            <a class="admin-page__back" href="/admin/users">"← Back to Users"</a>
            {move || match record.get() {
                Load::Pending => view! { <PageLoading text="Loading user data..."/> }.into_any(),
                Load::Failed(message) => view! { <PageError message/> }.into_any(),
                Load::Ready(user) => {
                    let created = format_timestamp(&user.created_at);
                    let updated = format_timestamp(&user.updated_at);
                    let subscription = user.stripe_customer_id.clone().map(|customer| {
                        let subscription_id = user.stripe_subscription_id.clone().unwrap_or_else(|| "N/A".to_owned());
                        let status = user.stripe_subscription_status.clone().unwrap_or_else(|| "N/A".to_owned());
                        view! {
                            <div class="user-edit__subscription">
                                <h3>"Subscription Info"</h3>
                                <p><span class="user-edit__label">"Stripe Customer ID:"</span> " " {customer}</p>
                                <p><span class="user-edit__label">"Subscription ID:"</span> " " {subscription_id}</p>
                                <p><span class="user-edit__label">"Status:"</span> " " {status}</p>
                            </div>
                        }
                    });
                    view! {
                        <h1 class="admin-page__title">"Edit User: " {user.email.clone()}</h1>
                        <form class="user-edit" on:submit=on_submit.clone()>
                            <div class="user-edit__row">
                                <span class="user-edit__label">"User ID:"</span>
                                <span class="user-edit__value">{user.id.clone()}</span>
                            </div>
                            <div class="user-edit__row">
                                <span class="user-edit__label">"Email:"</span>
                                <span class="user-edit__value">{user.email.clone()}</span>
                            </div>

                            <label for="firstName">"First Name"</label>
                            <input
                                id="firstName"
                                type="text"
                                prop:value=move || form.with(|f| f.as_ref().map(|f| f.first_name.clone()).unwrap_or_default())
                                on:input=edit(|f, v| f.first_name = v)
                                disabled=move || saving.get()
                            />

                            <label for="lastName">"Last Name"</label>
                            <input
                                id="lastName"
                                type="text"
                                prop:value=move || form.with(|f| f.as_ref().map(|f| f.last_name.clone()).unwrap_or_default())
                                on:input=edit(|f, v| f.last_name = v)
                                disabled=move || saving.get()
                            />

                            <label for="role">"Role"</label>
                            <select
                                id="role"
                                prop:value=move || form.with(|f| f.as_ref().map(|f| f.role).unwrap_or_default().as_str())
                                on:change=edit(|f, v| f.role = Role::parse(&v).unwrap_or(f.role))
                                disabled=move || saving.get()
                            >
                                {Role::ALL
                                    .into_iter()
                                    .map(|role| view! { <option value=role.as_str()>{role_label(role)}</option> })
                                    .collect_view()}
                            </select>

                            {subscription}

                            <div class="user-edit__timestamps">
                                <p>"Created: " {created}</p>
                                <p>"Last Updated: " {updated}</p>
                            </div>

                            <div class="user-edit__actions">
                                <button type="submit" disabled=move || saving.get()>
                                    {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                                </button>
                                <Show when=move || banner.get().is_some()>
                                    <p class="user-edit__success">{move || banner.get().unwrap_or_default()}</p>
                                </Show>
                                <Show when=move || save_error.get().is_some()>
                                    <p class="user-edit__error">"Error: " {move || save_error.get().unwrap_or_default()}</p>
                                </Show>
                            </div>
                        </form>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Free => "Free",
        Role::Pro => "Pro",
        Role::Admin => "Admin",
    }
}
