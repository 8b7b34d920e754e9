//! REST API helpers for the external admin/video backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error since the bearer token only
//! exists in browser storage.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Status handling and body decoding
//! are pure functions so the per-endpoint messages stay testable without a
//! browser. Pages render `ApiError`'s `Display` text directly.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;

use super::types::{
    LogPage, LoginResponse, Pagination, Role, SessionUser, UserData, UserEditData, UserUpdatePayload,
    VideoDetail, VideoSummary,
};
use crate::config::ClientConfig;

/// Failure of a REST call, already phrased for display.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No bearer token available for an authenticated endpoint.
    #[error("Not authenticated.")]
    AuthenticationMissing,
    /// 401 or 403 from the backend.
    #[error("{message}")]
    Unauthorized { status: u16, message: String },
    /// 404 from an endpoint that reports missing resources.
    #[error("{0}")]
    NotFound(String),
    /// Any other non-2xx response.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// A 2xx response whose body does not match the expected shape.
    #[error("{0}")]
    InvalidResponse(String),
    /// Login succeeded for an account without the admin role.
    #[error("Access denied. Administrator privileges required.")]
    AdminRequired,
}

impl ApiError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Per-endpoint wording for failed responses.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Endpoint {
    pub unauthorized: &'static str,
    pub not_found: Option<&'static str>,
    /// Prefix for other statuses, followed by the numeric status.
    pub failure: &'static str,
    pub invalid_body: &'static str,
}

pub(crate) const LOGS: Endpoint = Endpoint {
    unauthorized: "Unauthorized to fetch logs.",
    not_found: None,
    failure: "HTTP error! status:",
    invalid_body: "Invalid API response structure for logs.",
};

pub(crate) const USERS: Endpoint = Endpoint {
    unauthorized: "Unauthorized or Forbidden accessing users.",
    not_found: None,
    failure: "HTTP error! status:",
    invalid_body: "Invalid API response structure for users.",
};

pub(crate) const USER_DETAIL: Endpoint = Endpoint {
    unauthorized: "Unauthorized to fetch user details.",
    not_found: Some("User not found."),
    failure: "HTTP error! status:",
    invalid_body: "Invalid API response structure for user.",
};

pub(crate) const USER_UPDATE: Endpoint = Endpoint {
    unauthorized: "Unauthorized to update user.",
    not_found: Some("User not found for update."),
    failure: "Update failed with status:",
    invalid_body: "Invalid API response structure for user.",
};

pub(crate) const VIDEOS: Endpoint = Endpoint {
    unauthorized: "Unauthorized to view videos.",
    not_found: None,
    failure: "HTTP error! status:",
    invalid_body: "Invalid API response structure for videos.",
};

pub(crate) const VIDEO_DETAIL: Endpoint = Endpoint {
    unauthorized: "Access Denied.",
    not_found: Some("Video not found or processing."),
    failure: "HTTP error",
    invalid_body: "Invalid API response structure for video.",
};

/// Map a non-2xx response onto [`ApiError`].
pub(crate) fn error_for_status(status: u16, body: &str, endpoint: &Endpoint) -> ApiError {
    if status == 401 || status == 403 {
        return ApiError::Unauthorized { status, message: endpoint.unauthorized.to_owned() };
    }
    if status == 404 {
        if let Some(message) = endpoint.not_found {
            return ApiError::NotFound(message.to_owned());
        }
    }
    let message = body_message(body).unwrap_or_else(|| {
        let text = body.trim();
        if text.is_empty() || text.starts_with('{') {
            format!("{} {status}", endpoint.failure)
        } else {
            format!("{} {status}, message: {text}", endpoint.failure)
        }
    });
    ApiError::Server { status, message }
}

/// `message` field of a JSON error body, if any.
fn body_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Decode a 2xx body or report the endpoint's invalid-shape message.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str, endpoint: &Endpoint) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        leptos::logging::warn!("api: unexpected response body: {e}");
        ApiError::InvalidResponse(endpoint.invalid_body.to_owned())
    })
}

fn require_token(token: Option<&str>) -> Result<&str, ApiError> {
    token.filter(|t| !t.is_empty()).ok_or(ApiError::AuthenticationMissing)
}

/// Token and identity of a successful admin login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginSuccess {
    pub token: String,
    pub user: SessionUser,
}

/// Interpret a login response: surface backend errors, require the admin
/// role, and require a token.
pub(crate) fn login_outcome(ok: bool, status: u16, body: &str) -> Result<LoginSuccess, ApiError> {
    let parsed: LoginResponse = serde_json::from_str(body).unwrap_or_default();
    if !ok {
        let message = parsed
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Login failed with status {status}"));
        return Err(ApiError::Server { status, message });
    }

    let user = parsed.user.unwrap_or_default();
    if user.role.as_deref().and_then(Role::parse) != Some(Role::Admin) {
        return Err(ApiError::AdminRequired);
    }

    match parsed.token.filter(|t| !t.is_empty()) {
        Some(token) => Ok(LoginSuccess { token, user: SessionUser { id: user.id, role: Role::Admin } }),
        None => Err(ApiError::InvalidResponse("Login successful, but no token received.".to_owned())),
    }
}

/// Page request for the log viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogQuery {
    pub page: u32,
    pub limit: u32,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self { page: 1, limit: 25 }
    }
}

impl LogQuery {
    /// Query string, newest entries first.
    #[must_use]
    pub fn query_string(&self) -> String {
        format!("page={}&limit={}&sort=-timestamp", self.page, self.limit)
    }

    /// Following page, if the pagination says one exists.
    #[must_use]
    pub fn next(&self, pagination: Option<&Pagination>) -> Option<Self> {
        let pagination = pagination?;
        (self.page < pagination.total_pages).then(|| Self { page: self.page + 1, ..*self })
    }

    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        (self.page > 1).then(|| Self { page: self.page - 1, ..*self })
    }
}

#[cfg(feature = "hydrate")]
async fn execute(request: gloo_net::http::Request, endpoint: &Endpoint) -> Result<String, ApiError> {
    let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if !resp.ok() {
        let err = error_for_status(status, &body, endpoint);
        leptos::logging::warn!("api: {} -> {status}: {err}", resp.url());
        return Err(err);
    }
    Ok(body)
}

#[cfg(feature = "hydrate")]
fn authorized(builder: gloo_net::http::RequestBuilder, token: &str) -> gloo_net::http::RequestBuilder {
    builder
        .header("Authorization", &format!("Bearer {token}"))
        .header("Content-Type", "application/json")
}

#[cfg(feature = "hydrate")]
async fn get_json<T: DeserializeOwned>(url: &str, token: &str, endpoint: &Endpoint) -> Result<T, ApiError> {
    let request = authorized(gloo_net::http::Request::get(url), token)
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let body = execute(request, endpoint).await?;
    decode_body(&body, endpoint)
}

#[cfg(not(feature = "hydrate"))]
fn unavailable<T>() -> Result<T, ApiError> {
    Err(ApiError::Network("not available on server".to_owned()))
}

/// Authenticate with `POST /auth/login`; only admin accounts are accepted.
///
/// # Errors
///
/// Returns [`ApiError::Server`] with the backend message on failure,
/// [`ApiError::AdminRequired`] for non-admin accounts, and
/// [`ApiError::InvalidResponse`] when no token comes back.
pub async fn login(config: &ClientConfig, email: &str, password: &str) -> Result<LoginSuccess, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email, "password": password });
        let resp = gloo_net::http::Request::post(&config.api_url("/auth/login"))
            .json(&payload)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body = resp.text().await.unwrap_or_default();
        login_outcome(resp.ok(), resp.status(), &body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, email, password);
        unavailable()
    }
}

/// Fetch one page of `GET /admin/logs`.
///
/// # Errors
///
/// Returns [`ApiError`] for a missing token, non-2xx status, or malformed body.
pub async fn fetch_logs(config: &ClientConfig, token: Option<&str>, query: LogQuery) -> Result<LogPage, ApiError> {
    let token = require_token(token)?;
    #[cfg(feature = "hydrate")]
    {
        let url = format!("{}?{}", config.api_url("/admin/logs"), query.query_string());
        get_json(&url, token, &LOGS).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, query);
        unavailable()
    }
}

/// Fetch `GET /admin/users`.
///
/// # Errors
///
/// Returns [`ApiError`] for a missing token, non-2xx status, or malformed body.
pub async fn fetch_users(config: &ClientConfig, token: Option<&str>) -> Result<Vec<UserData>, ApiError> {
    let token = require_token(token)?;
    #[cfg(feature = "hydrate")]
    {
        get_json(&config.api_url("/admin/users"), token, &USERS).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token);
        unavailable()
    }
}

/// Fetch `GET /admin/users/:id`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for unknown users, otherwise as [`fetch_users`].
pub async fn fetch_user(config: &ClientConfig, token: Option<&str>, user_id: &str) -> Result<UserEditData, ApiError> {
    let token = require_token(token)?;
    #[cfg(feature = "hydrate")]
    {
        get_json(&config.api_url(&format!("/admin/users/{user_id}")), token, &USER_DETAIL).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, user_id);
        unavailable()
    }
}

/// Save role and names with `PUT /admin/users/:id`; returns the updated record.
///
/// # Errors
///
/// Returns [`ApiError`] with the backend `message` when the update is rejected.
pub async fn update_user(
    config: &ClientConfig,
    token: Option<&str>,
    user_id: &str,
    payload: &UserUpdatePayload,
) -> Result<UserEditData, ApiError> {
    let token = require_token(token)?;
    #[cfg(feature = "hydrate")]
    {
        let request = authorized(
            gloo_net::http::Request::put(&config.api_url(&format!("/admin/users/{user_id}"))),
            token,
        )
        .json(payload)
        .map_err(|e| ApiError::Network(e.to_string()))?;
        let body = execute(request, &USER_UPDATE).await?;
        decode_body(&body, &USER_UPDATE)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, user_id, payload);
        unavailable()
    }
}

/// Fetch the `GET /videos` catalogue visible to the token's account.
///
/// # Errors
///
/// Returns [`ApiError`] for a missing token, non-2xx status, or malformed body.
pub async fn fetch_videos(config: &ClientConfig, token: Option<&str>) -> Result<Vec<VideoSummary>, ApiError> {
    let token = require_token(token)?;
    #[cfg(feature = "hydrate")]
    {
        get_json(&config.api_url("/videos"), token, &VIDEOS).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token);
        unavailable()
    }
}

/// Fetch `GET /videos/:id`; details without a playback id are rejected.
///
/// # Errors
///
/// Returns [`ApiError::InvalidResponse`] when playback information is missing,
/// otherwise as [`fetch_videos`].
pub async fn fetch_video(config: &ClientConfig, token: Option<&str>, video_id: &str) -> Result<VideoDetail, ApiError> {
    let token = require_token(token)?;
    #[cfg(feature = "hydrate")]
    {
        let detail: VideoDetail = get_json(&config.api_url(&format!("/videos/{video_id}")), token, &VIDEO_DETAIL).await?;
        require_playback(detail)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, video_id);
        unavailable()
    }
}

pub(crate) fn require_playback(detail: VideoDetail) -> Result<VideoDetail, ApiError> {
    if detail.mux_playback_id.as_deref().is_some_and(|id| !id.is_empty()) {
        Ok(detail)
    } else {
        Err(ApiError::InvalidResponse(
            "Video data received, but playback information is missing.".to_owned(),
        ))
    }
}
