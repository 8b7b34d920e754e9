//! Networking modules for the REST backend and the realtime server.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `socket` speaks the Socket.IO handshake and owns
//! the browser websocket, and `types` defines the shared wire schema.

pub mod api;
pub mod socket;
pub mod types;
