//! Demo business endpoints gated by the auth gate.
//!
//! These stand in for the downstream projects a real deployment would front;
//! they show how a protected handler composes `require_login` as a guard
//! clause before doing its own work.

use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

use super::auth::{require_login, AuthState};

#[utoipa::path(
    get,
    path = "/pc/api/data",
    responses(
        (status = 200, description = "PC project data with the requesting identity"),
        (status = 401, description = "Anonymous request while the gate is in required mode")
    ),
    tag = "projects"
)]
pub async fn pc_data(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    let user = match require_login(&headers, &auth_state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    Json(json!({
        "project": "pc",
        "user": user,
        "items": [
            { "id": 1, "name": "PC Item 1" },
            { "id": 2, "name": "PC Item 2" }
        ]
    }))
    .into_response()
}

#[utoipa::path(
    get,
    path = "/fs/api/data",
    responses(
        (status = 200, description = "FS project data with the requesting identity"),
        (status = 401, description = "Anonymous request while the gate is in required mode")
    ),
    tag = "projects"
)]
pub async fn fs_data(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    let user = match require_login(&headers, &auth_state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    Json(json!({
        "project": "fs",
        "user": user,
        "items": [
            { "id": 101, "name": "File System Item A" },
            { "id": 102, "name": "File System Item B" }
        ]
    }))
    .into_response()
}
