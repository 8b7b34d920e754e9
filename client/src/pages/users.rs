//! User management list.

use leptos::prelude::*;
use leptos_router::components::A;

use super::common::{Load, PageError, PageLoading, load_into, ready_token};
use crate::config::ClientConfig;
use crate::net::api;
use crate::net::types::UserData;
use crate::state::auth::AuthController;
use crate::util::time::format_date;

#[component]
pub fn UsersPage() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let config = expect_context::<ClientConfig>();
    let token = ready_token(auth.state());
    let users = RwSignal::new(Load::<Vec<UserData>>::Pending);

    Effect::new(move || {
        let Some(token) = token.get() else {
            return;
        };
        let config = config.clone();
        let policy = config.unauthorized_policy;
        load_into(users, "fetch users", auth.clone(), policy, async move {
            api::fetch_users(&config, Some(&token)).await
        });
    });

    view! {
        <div class="admin-page">
            <h1 class="admin-page__title">"Manage Users"</h1>
            {move || match users.get() {
                Load::Pending => view! { <PageLoading text="Loading..."/> }.into_any(),
                Load::Failed(message) => view! { <PageError message/> }.into_any(),
                Load::Ready(list) if list.is_empty() => view! { <p>"No users found."</p> }.into_any(),
                Load::Ready(list) => view! {
                    <div class="admin-table-wrap">
                        <table class="admin-table">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Email"</th>
                                    <th>"Role"</th>
                                    <th>"Joined"</th>
                                    <th><span class="sr-only">"Actions"</span></th>
                                </tr>
                            </thead>
                            <tbody>
                                {list.into_iter().map(user_row).collect_view()}
                            </tbody>
                        </table>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

fn user_row(user: UserData) -> impl IntoView {
    let href = format!("/admin/users/{}", user.id);
    let name = user.display_name();
    let joined = format_date(&user.created_at);
    view! {
        <tr>
            <td class="admin-table__strong">{name}</td>
            <td>{user.email}</td>
            <td>{user.role}</td>
            <td>{joined}</td>
            <td class="admin-table__actions"><A href=href>"Edit"</A></td>
        </tr>
    }
}
