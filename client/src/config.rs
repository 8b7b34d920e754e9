//! Client configuration resolved at build time.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser bundle has no process environment, so the backend address is
//! inlined when the WASM crate is compiled (`BACKEND_API_URL`). The resolved
//! [`ClientConfig`] is provided as Leptos context by the root component.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001/api";
pub const FALLBACK_SOCKET_ORIGIN: &str = "ws://localhost:5001/";
pub const LOGIN_PATH: &str = "/admin/login";
pub const POST_LOGIN_PATH: &str = "/admin/users";
pub const DEFAULT_RECONNECTION_ATTEMPTS: u32 = 5;
pub const DEFAULT_RECONNECTION_DELAY_MS: u32 = 1_000;
pub const DEFAULT_RECONNECTION_DELAY_MAX_MS: u32 = 5_000;

const SOCKET_IO_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

/// What admin pages do with a 401/403 from the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnauthorizedPolicy {
    /// Show the error and leave the session alone.
    #[default]
    DisplayOnly,
    /// Show the error, then clear the session so the route guard redirects.
    ForceLogout,
}

/// Bounded reconnection schedule for the realtime transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Reconnection attempts after the first failed or dropped connection.
    pub attempts: u32,
    pub base_delay_ms: u32,
    pub max_delay_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RECONNECTION_ATTEMPTS,
            base_delay_ms: DEFAULT_RECONNECTION_DELAY_MS,
            max_delay_ms: DEFAULT_RECONNECTION_DELAY_MAX_MS,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnection attempt `attempt` (1-based), doubling up to the cap.
    #[must_use]
    pub fn delay_ms(&self, attempt: u32) -> u32 {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay_ms
            .saturating_mul(1_u32 << exponent)
            .min(self.max_delay_ms)
    }

    /// Whether another attempt is allowed after `failures` consecutive failures.
    #[must_use]
    pub fn allows_retry(&self, failures: u32) -> bool {
        failures <= self.attempts
    }
}

/// Resolved client settings shared through Leptos context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST base address without trailing slash, e.g. `http://localhost:5001/api`.
    pub api_base_url: String,
    pub login_path: String,
    pub post_login_path: String,
    pub reconnect: ReconnectPolicy,
    pub unauthorized_policy: UnauthorizedPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

impl ClientConfig {
    /// Read `BACKEND_API_URL` and `UNAUTHORIZED_POLICY` as inlined at compile time.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::resolve(option_env!("BACKEND_API_URL"), option_env!("UNAUTHORIZED_POLICY"))
    }

    /// Build a config from raw setting values, falling back to defaults.
    #[must_use]
    pub fn resolve(api_base_url: Option<&str>, unauthorized_policy: Option<&str>) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        Self {
            api_base_url,
            login_path: LOGIN_PATH.to_owned(),
            post_login_path: POST_LOGIN_PATH.to_owned(),
            reconnect: ReconnectPolicy::default(),
            unauthorized_policy: parse_unauthorized_policy(unauthorized_policy),
        }
    }

    /// Absolute REST URL for `path` (which must start with `/`).
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }

    /// Websocket URL of the realtime server derived from the REST base.
    #[must_use]
    pub fn socket_endpoint(&self) -> String {
        socket_endpoint(&self.api_base_url)
    }
}

fn parse_unauthorized_policy(raw: Option<&str>) -> UnauthorizedPolicy {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("force-logout" | "force_logout" | "logout") => UnauthorizedPolicy::ForceLogout,
        _ => UnauthorizedPolicy::DisplayOnly,
    }
}

/// Cut the path at its first `/api` segment, swap `http` for `ws`, and append
/// the Engine.IO websocket path. Hosts such as `api.example.com` are kept.
#[must_use]
pub fn socket_endpoint(api_base_url: &str) -> String {
    let base = api_base_url.trim();
    let authority_start = base.find("://").map_or(0, |i| i + 3);
    let path_start = base[authority_start..].find('/').map_or(base.len(), |i| authority_start + i);
    let (origin, path) = base.split_at(path_start);
    let kept_path = path
        .match_indices("/api")
        .find(|(i, _)| matches!(path.as_bytes().get(i + 4).copied(), None | Some(b'/' | b'?')))
        .map_or(path, |(i, _)| &path[..i]);

    let origin = format!("{origin}{kept_path}");
    let origin = if origin.is_empty() {
        FALLBACK_SOCKET_ORIGIN.to_owned()
    } else if let Some(rest) = origin.strip_prefix("http") {
        format!("ws{rest}")
    } else {
        origin
    };
    format!("{}{SOCKET_IO_PATH}", origin.trim_end_matches('/'))
}
