//! Auth state and process-wide configuration.

use anyhow::anyhow;
use secrecy::SecretString;
use std::str::FromStr;

const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Gate behavior for requests without a resolved identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// Anonymous requests to protected endpoints are rejected with 401.
    Required,
    /// Anonymous requests pass through with no identity attached.
    Public,
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "public" => Ok(Self::Public),
            other => Err(anyhow!("invalid auth mode: {other}")),
        }
    }
}

/// `SameSite` attribute emitted on the session cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSitePolicy {
    Lax,
    None,
    Strict,
}

impl SameSitePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::None => "None",
            Self::Strict => "Strict",
        }
    }
}

impl FromStr for SameSitePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            "strict" => Ok(Self::Strict),
            other => Err(anyhow!("invalid same-site policy: {other}")),
        }
    }
}

/// Immutable configuration threaded from the CLI into the handlers.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    secret: SecretString,
    auth_mode: AuthMode,
    token_ttl_seconds: i64,
    cookie_domain: Option<String>,
    cookie_secure: bool,
    cookie_same_site: SameSitePolicy,
}

impl AuthConfig {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            auth_mode: AuthMode::Required,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            cookie_domain: None,
            cookie_secure: false,
            cookie_same_site: SameSitePolicy::Lax,
        }
    }

    #[must_use]
    pub fn with_auth_mode(mut self, mode: AuthMode) -> Self {
        self.auth_mode = mode;
        self
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_domain(mut self, domain: String) -> Self {
        let trimmed = domain.trim().to_string();
        self.cookie_domain = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        };
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_cookie_same_site(mut self, policy: SameSitePolicy) -> Self {
        self.cookie_same_site = policy;
        self
    }

    pub(crate) fn secret(&self) -> &SecretString {
        &self.secret
    }

    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    #[must_use]
    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub fn cookie_domain(&self) -> Option<&str> {
        self.cookie_domain.as_deref()
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn cookie_same_site(&self) -> SameSitePolicy {
        self.cookie_same_site
    }
}

/// Shared auth state handed to handlers via `Extension`.
pub struct AuthState {
    config: AuthConfig,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
