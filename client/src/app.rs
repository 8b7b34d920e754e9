//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{ParentRoute, Redirect, Route, Router, Routes},
};

use crate::components::admin_layout::AdminLayout;
use crate::config::ClientConfig;
use crate::pages::{
    login::LoginPage,
    logs::LogsPage,
    realtime::RealtimePage,
    user_edit::UserEditPage,
    users::UsersPage,
    videos::{VideoDetailPage, VideosPage},
};
use crate::state::auth::AuthController;
use crate::state::session::BrowserStorage;

/// Web component used by the video detail page.
const MUX_PLAYER_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/@mux/mux-player";

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <script src=MUX_PLAYER_SCRIPT defer></script>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the client configuration and the single auth controller, runs
/// session initialization once after mount, and sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    let auth = AuthController::new(BrowserStorage);
    provide_context(config);
    provide_context(auth.clone());

    // Effects only run in the browser, so SSR and the first hydrated render
    // both see `loading = true`.
    Effect::new(move || auth.initialize());

    view! {
        <Stylesheet id="leptos" href="/pkg/streamdesk.css"/>
        <Title text="Streamdesk"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <ParentRoute path=StaticSegment("admin") view=AdminLayout>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("users") view=UsersPage/>
                    <Route path=(StaticSegment("users"), ParamSegment("id")) view=UserEditPage/>
                    <Route path=StaticSegment("logs") view=LogsPage/>
                    <Route path=StaticSegment("") view=|| view! { <Redirect path="/admin/users"/> }/>
                </ParentRoute>
                <Route path=StaticSegment("videos") view=VideosPage/>
                <Route path=(StaticSegment("videos"), ParamSegment("id")) view=VideoDetailPage/>
                <Route path=StaticSegment("websocket-test") view=RealtimePage/>
                <Route path=StaticSegment("") view=|| view! { <Redirect path="/admin/users"/> }/>
            </Routes>
        </Router>
    }
}
