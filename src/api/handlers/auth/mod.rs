//! Authentication and authorization flow.
//!
//! Flow Overview: `login` verifies credentials against the store and issues a
//! signed token in an `HttpOnly` cookie; `session` resolves that cookie back
//! into an identity on each request and applies the gate mode; `me` and
//! `logout` round out the cookie lifecycle.

pub mod login;
pub mod password;
pub mod session;
pub mod state;
pub mod storage;
pub mod token;
pub mod types;

pub use self::login::login;
pub use self::session::{logout, me, require_login, resolve_optional, SESSION_COOKIE_NAME};
pub use self::state::{AuthConfig, AuthMode, AuthState, SameSitePolicy};
