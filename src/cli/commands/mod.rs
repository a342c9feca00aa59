use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

// Development fallback only, override via PORDEGO_SECRET in production.
const DEFAULT_SECRET: &str = "09d25e094faa6ca2556c818166b7a9563b93f7099f6f0f4caa6cf63b88e8d3e7";

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn validator_auth_mode() -> ValueParser {
    ValueParser::from(
        move |mode: &str| -> std::result::Result<String, String> {
            match mode.to_lowercase().as_str() {
                "required" | "public" => Ok(mode.to_lowercase()),
                _ => Err("auth mode must be 'required' or 'public'".to_string()),
            }
        },
    )
}

pub fn validator_same_site() -> ValueParser {
    ValueParser::from(
        move |policy: &str| -> std::result::Result<String, String> {
            match policy.to_lowercase().as_str() {
                "lax" | "none" | "strict" => Ok(policy.to_lowercase()),
                _ => Err("same-site policy must be 'lax', 'none' or 'strict'".to_string()),
            }
        },
    )
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("pordego")
        .about("Single sign-on gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORDEGO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("dsn")
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .default_value("sqlite://pordego.db?mode=rwc")
                .env("PORDEGO_DSN"),
        )
        .arg(
            Arg::new("secret")
                .long("secret")
                .help("Symmetric secret used to sign session tokens")
                .default_value(DEFAULT_SECRET)
                .env("PORDEGO_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("auth-mode")
                .long("auth-mode")
                .help("Gate mode for protected endpoints: required (reject anonymous) or public (pass through)")
                .default_value("required")
                .env("PORDEGO_AUTH_MODE")
                .value_parser(validator_auth_mode()),
        )
        .arg(
            Arg::new("token-ttl")
                .long("token-ttl")
                .help("Session token time-to-live in seconds")
                .default_value("86400")
                .env("PORDEGO_TOKEN_TTL")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("cookie-domain")
                .long("cookie-domain")
                .help("Domain attribute for the session cookie, leave unset for localhost development")
                .env("PORDEGO_COOKIE_DOMAIN"),
        )
        .arg(
            Arg::new("cookie-secure")
                .long("cookie-secure")
                .help("Mark the session cookie Secure (HTTPS deployments)")
                .env("PORDEGO_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cookie-samesite")
                .long("cookie-samesite")
                .help("SameSite policy for the session cookie: lax, none or strict")
                .default_value("lax")
                .env("PORDEGO_COOKIE_SAMESITE")
                .value_parser(validator_same_site()),
        )
        .arg(
            Arg::new("cors-origins")
                .long("cors-origins")
                .help("Comma-separated list of allowed cross-origin request sources")
                .env("PORDEGO_CORS_ORIGINS"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("PORDEGO_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
