//! Streamdesk SSR host.
//!
//! Renders the Leptos admin dashboard and video frontend and serves its
//! browser bundle. Configuration comes from the environment (`.env` is
//! loaded first) and `[package.metadata.leptos]`.

mod config;
mod error;
mod routes;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::HostConfig;
use crate::error::HostError;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "streamdesk stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), HostError> {
    let host = HostConfig::from_env()?;
    let conf = leptos::prelude::get_configuration(None).map_err(|e| HostError::LeptosConfig(e.to_string()))?;
    let mut leptos_options = conf.leptos_options;
    let addr = host.socket_addr();
    leptos_options.site_addr = addr;

    let app = routes::app(leptos_options);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| HostError::Bind { addr, source })?;

    tracing::info!(%addr, "streamdesk listening");
    axum::serve(listener, app).await.map_err(HostError::Serve)
}
