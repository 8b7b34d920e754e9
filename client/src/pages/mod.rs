//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (loading, REST calls, realtime
//! lifecycle) and leaves session and connection rules to `state`.

pub mod common;
pub mod login;
pub mod logs;
pub mod realtime;
pub mod user_edit;
pub mod users;
pub mod videos;
