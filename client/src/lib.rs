//! # client
//!
//! Leptos + WASM frontend for the streamdesk admin dashboard and video
//! catalogue.
//!
//! This crate contains the persisted session store, the auth controller and
//! route guard, the Socket.IO realtime client, REST helpers for the external
//! backend, and the pages that render them. The `ssr` feature renders the
//! same components on the host; `hydrate` attaches them in the browser.

#![recursion_limit = "256"]

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: attach the server-rendered app.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger not installed: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
