use crate::api::handlers::auth::{AuthConfig, AuthMode, SameSitePolicy};
use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let secret = matches
        .get_one::<String>("secret")
        .map(|s| SecretString::from(s.clone()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --secret"))?;

    let auth_mode = matches
        .get_one::<String>("auth-mode")
        .map(String::as_str)
        .unwrap_or("required")
        .parse::<AuthMode>()?;

    let same_site = matches
        .get_one::<String>("cookie-samesite")
        .map(String::as_str)
        .unwrap_or("lax")
        .parse::<SameSitePolicy>()?;

    let mut auth = AuthConfig::new(secret)
        .with_auth_mode(auth_mode)
        .with_cookie_secure(matches.get_flag("cookie-secure"))
        .with_cookie_same_site(same_site);

    if let Some(ttl) = matches.get_one::<i64>("token-ttl").copied() {
        auth = auth.with_token_ttl_seconds(ttl);
    }

    if let Some(domain) = matches.get_one::<String>("cookie-domain") {
        auth = auth.with_cookie_domain(domain.clone());
    }

    let cors_origins = matches
        .get_one::<String>("cors-origins")
        .map(|origins| {
            origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        auth,
        cors_origins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_dispatch_defaults() -> Result<()> {
        let matches = commands::new().get_matches_from(vec!["pordego"]);
        let action = handler(&matches)?;

        let Action::Server {
            port,
            dsn,
            auth,
            cors_origins,
        } = action;

        assert_eq!(port, 8080);
        assert_eq!(dsn, "sqlite://pordego.db?mode=rwc");
        assert_eq!(auth.auth_mode(), AuthMode::Required);
        assert_eq!(auth.token_ttl_seconds(), 86400);
        assert_eq!(auth.cookie_domain(), None);
        assert!(!auth.cookie_secure());
        assert_eq!(auth.cookie_same_site(), SameSitePolicy::Lax);
        assert!(cors_origins.is_empty());
        Ok(())
    }

    #[test]
    fn test_dispatch_overrides() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "pordego",
            "--port",
            "9090",
            "--auth-mode",
            "public",
            "--token-ttl",
            "600",
            "--cookie-domain",
            ".example.com",
            "--cookie-secure",
            "--cookie-samesite",
            "none",
            "--cors-origins",
            "http://localhost:5173, https://app.example.com",
        ]);
        let action = handler(&matches)?;

        let Action::Server {
            port,
            auth,
            cors_origins,
            ..
        } = action;

        assert_eq!(port, 9090);
        assert_eq!(auth.auth_mode(), AuthMode::Public);
        assert_eq!(auth.token_ttl_seconds(), 600);
        assert_eq!(auth.cookie_domain(), Some(".example.com"));
        assert!(auth.cookie_secure());
        assert_eq!(auth.cookie_same_site(), SameSitePolicy::None);
        assert_eq!(
            cors_origins,
            vec![
                "http://localhost:5173".to_string(),
                "https://app.example.com".to_string()
            ]
        );
        Ok(())
    }
}
