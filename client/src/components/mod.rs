//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the admin chrome and shared widgets while reading auth
//! and configuration from Leptos context providers.

pub mod admin_layout;
pub mod mux_player;
pub mod route_guard;
