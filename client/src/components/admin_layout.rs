//! Admin shell: sidebar navigation around the nested admin routes.

use leptos::prelude::*;
use leptos_router::components::{A, Outlet};

use crate::components::route_guard::RouteGuard;
use crate::state::auth::AuthController;

/// Guarded layout for `/admin/*`. The sidebar appears once signed in; the
/// login page renders bare inside the same guard.
#[component]
pub fn AdminLayout() -> impl IntoView {
    let auth = expect_context::<AuthController>();
    let state = auth.state();
    let signed_in = move || state.with(|s| s.token.is_some());

    let logout = auth.logout_callback();

    view! {
        <RouteGuard>
            <section class="admin-shell">
                <Show when=signed_in>
                    <aside class="admin-sidebar">
                        <h2 class="admin-sidebar__title">"Admin Panel"</h2>
                        <nav>
                            <ul class="admin-sidebar__nav">
                                <li><A href="/admin/users">"Users"</A></li>
                                <li><A href="/admin/logs">"Logs"</A></li>
                                <li><A href="/websocket-test">"WebSockets"</A></li>
                            </ul>
                        </nav>
                        <button class="admin-sidebar__logout" on:click=move |_| logout.run(())>
                            "Logout"
                        </button>
                    </aside>
                </Show>
                <main class="admin-main">
                    <Outlet/>
                </main>
            </section>
        </RouteGuard>
    }
}
