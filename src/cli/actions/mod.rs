pub mod server;

use crate::api::handlers::auth::AuthConfig;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        auth: AuthConfig,
        cors_origins: Vec<String>,
    },
}
