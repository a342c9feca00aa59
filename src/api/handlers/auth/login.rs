//! Login flow: credential check, token issuance, cookie emission.

use axum::{
    extract::{Extension, Form, FromRequest, Json, Request},
    http::{
        header::{CONTENT_TYPE, SET_COOKIE, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::error;

use super::{
    password::{verify_dummy, verify_password},
    session::session_cookie,
    state::AuthState,
    storage::lookup_user,
    token::encode_token,
    types::{LoginRequest, TokenResponse, UserView},
};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, session cookie set", body = TokenResponse),
        (status = 401, description = "Unknown username or wrong password", body = String),
        (status = 422, description = "Malformed body or missing fields", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth_state): Extension<Arc<AuthState>>,
    request: Request,
) -> Response {
    let credentials = match parse_credentials(request).await {
        Ok(credentials) => credentials,
        Err(response) => return response,
    };

    let record = match lookup_user(&pool, &credentials.username).await {
        Ok(record) => record,
        Err(err) => {
            error!("Failed to lookup user: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Unknown username and wrong password share one code path and one error;
    // the dummy verification keeps the timings comparable.
    let record = match record {
        Some(record) if verify_password(&credentials.password, &record.hashed_password) => record,
        Some(_) => return invalid_credentials_response(),
        None => {
            verify_dummy(&credentials.password);
            return invalid_credentials_response();
        }
    };

    let config = auth_state.config();
    let token = match encode_token(
        &record.username,
        &record.roles,
        &record.user_type,
        &record.permissions,
        config.secret(),
        config.token_ttl_seconds(),
    ) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to sign session token: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    match session_cookie(config, &token) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let response = TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserView::from(&record),
    };

    (StatusCode::OK, response_headers, Json(response)).into_response()
}

/// Read credentials from either a JSON body or a URL-encoded form, selected
/// by Content-Type. Parse failures and blank fields are 422.
async fn parse_credentials(request: Request) -> Result<LoginRequest, Response> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"));

    let credentials = if is_json {
        match Json::<LoginRequest>::from_request(request, &()).await {
            Ok(Json(payload)) => payload,
            Err(err) => {
                return Err((
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Invalid JSON body: {err}"),
                )
                    .into_response());
            }
        }
    } else {
        match Form::<LoginRequest>::from_request(request, &()).await {
            Ok(Form(payload)) => payload,
            Err(err) => {
                return Err((
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Invalid form data: {err}"),
                )
                    .into_response());
            }
        }
    };

    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Missing required fields: username and password".to_string(),
        )
            .into_response());
    }

    Ok(credentials)
}

fn invalid_credentials_response() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    (
        StatusCode::UNAUTHORIZED,
        headers,
        "Incorrect username or password".to_string(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(content_type: &str, body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_json_credentials() {
        let request = request(
            "application/json",
            r#"{"username":"admin","password":"admin123"}"#,
        );
        let credentials = parse_credentials(request).await.expect("should parse");
        assert_eq!(credentials.username, "admin");
        assert_eq!(credentials.password, "admin123");
    }

    #[tokio::test]
    async fn parses_form_credentials() {
        let request = request(
            "application/x-www-form-urlencoded",
            "username=user&password=user123",
        );
        let credentials = parse_credentials(request).await.expect("should parse");
        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password, "user123");
    }

    #[tokio::test]
    async fn malformed_json_is_unprocessable() {
        let request = request("application/json", "{not json");
        let response = parse_credentials(request).await.expect_err("should fail");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn blank_fields_are_unprocessable() {
        let request = request("application/json", r#"{"username":"","password":"x"}"#);
        let response = parse_credentials(request).await.expect_err("should fail");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn invalid_credentials_response_shape() {
        let response = invalid_credentials_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }
}
