//! # Pordego (Single Sign-On Gateway)
//!
//! `pordego` authenticates users against a credential store, issues a signed
//! session token carried in an `HttpOnly` cookie, and gates access to the
//! business endpoints behind it.
//!
//! ## Sessions
//!
//! Sessions are stateless: the cookie carries an HS256-signed JWT whose
//! validity is purely a function of signature and expiry. Any process holding
//! the signing secret can validate a token independently; there is no
//! server-side session table and therefore no revocation list.
//!
//! ## Auth gate
//!
//! A process-wide mode switch controls anonymous access:
//!
//! - `required`: requests without a valid session cookie get `401`.
//! - `public`: the same requests pass through with an anonymous identity.
//!
//! Login failures use a single generic error for unknown usernames and wrong
//! passwords so account enumeration is not possible through the login
//! endpoint.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
