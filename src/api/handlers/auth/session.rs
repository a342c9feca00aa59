//! Session resolution, the auth gate, and the cookie endpoints.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

use super::{
    state::{AuthConfig, AuthMode, AuthState},
    token::decode_token,
    types::{MessageResponse, UserView},
};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE_NAME: &str = "sso_token";

/// Resolve the session cookie into an identity, if possible.
///
/// Missing cookie and invalid token both come back as `None`; callers cannot
/// tell the cases apart.
#[must_use]
pub fn resolve_optional(headers: &HeaderMap, config: &AuthConfig) -> Option<UserView> {
    let token = extract_session_token(headers)?;
    decode_token(&token, config.secret()).map(UserView::from)
}

/// Apply the gate mode to a resolved identity.
///
/// In `required` mode an absent identity is rejected; in `public` mode it
/// passes through as anonymous.
pub fn enforce(mode: AuthMode, identity: Option<UserView>) -> Result<Option<UserView>, Response> {
    match (mode, identity) {
        (AuthMode::Required, None) => Err(auth_required_response()),
        (_, identity) => Ok(identity),
    }
}

/// Resolve and gate in one step, for protected handlers.
pub fn require_login(
    headers: &HeaderMap,
    auth_state: &AuthState,
) -> Result<Option<UserView>, Response> {
    let identity = resolve_optional(headers, auth_state.config());
    enforce(auth_state.config().auth_mode(), identity)
}

pub(super) fn auth_required_response() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    (
        StatusCode::UNAUTHORIZED,
        headers,
        "Not authenticated".to_string(),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current identity derived from the session cookie", body = UserView),
        (status = 401, description = "No valid session cookie")
    ),
    tag = "auth"
)]
pub async fn me(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    match resolve_optional(&headers, auth_state.config()) {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => auth_required_response(),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> Response {
    // Nothing to revoke server-side; instruct the client to drop the cookie.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build clear-cookie header: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse {
            message: "logged out".to_string(),
        }),
    )
        .into_response()
}

/// Build the `HttpOnly` session cookie for a freshly issued token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let same_site = config.cookie_same_site().as_str();
    let max_age = config.token_ttl_seconds().max(0);
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite={same_site}; Max-Age={max_age}"
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    if let Some(domain) = config.cookie_domain() {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let same_site = config.cookie_same_site().as_str();
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite={same_site}; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    if let Some(domain) = config.cookie_domain() {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    HeaderValue::from_str(&cookie)
}

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}
