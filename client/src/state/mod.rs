//! Client-side state shared through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` is the durable copy of the login in browser storage, `auth` the
//! live in-memory session built on it, and `realtime` the websocket test
//! page's connection state.

pub mod auth;
pub mod realtime;
pub mod session;
