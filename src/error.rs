//! Host startup and serve failures.

use std::net::SocketAddr;

/// Errors that stop the host process.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("invalid {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    /// Missing or malformed `[package.metadata.leptos]` section.
    #[error("leptos configuration: {0}")]
    LeptosConfig(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}
