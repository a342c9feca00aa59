//! `OpenAPI` document for the HTTP surface, served by Swagger UI at `/docs`.

use utoipa::OpenApi;

use crate::api::handlers::{auth, health, projects};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pordego",
        description = "Single sign-on gateway",
    ),
    paths(
        health::root,
        health::health,
        auth::login::login,
        auth::session::me,
        auth::session::logout,
        projects::pc_data,
        projects::fs_data,
    ),
    components(schemas(
        auth::types::LoginRequest,
        auth::types::UserView,
        auth::types::TokenResponse,
        auth::types::MessageResponse,
    )),
    tags(
        (name = "auth", description = "Login, session and logout endpoints"),
        (name = "projects", description = "Demo business endpoints behind the auth gate"),
        (name = "health", description = "Liveness and build information")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_auth_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;
        assert!(paths.contains_key("/auth/login"));
        assert!(paths.contains_key("/auth/me"));
        assert!(paths.contains_key("/auth/logout"));
        assert!(paths.contains_key("/pc/api/data"));
        assert!(paths.contains_key("/fs/api/data"));
    }
}
