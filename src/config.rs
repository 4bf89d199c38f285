//! Runtime configuration for the scouting server.

use std::env;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnv(&'static str),
    #[error("unsupported JWT algorithm: {0}")]
    Algorithm(String),
}

/// Upstream sports-data provider connection settings.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Per-call timeout for regular resource fetches.
    pub timeout: Duration,
    /// Shorter timeout for single-name lookups (competition names).
    pub lookup_timeout: Duration,
}

impl ProviderSettings {
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            base_url: "https://apirest.wyscout.com".into(),
            username: String::new(),
            password: String::new(),
            timeout: Duration::from_secs(30),
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

/// Season-id thresholds used to bucket career entries into seasons.
///
/// The provider's season ids are opaque; these cut-offs were read off observed
/// data and only hold for that range, hence overridable from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonThresholds {
    /// Ids strictly above this are the current season.
    pub current: i64,
    /// Ids strictly above this (and not current) are the previous season.
    pub previous: i64,
    /// Calendar year in which the current season starts.
    pub base_year: i32,
}

impl Default for SeasonThresholds {
    fn default() -> Self {
        SeasonThresholds {
            current: 190_000,
            previous: 185_000,
            base_year: 2024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: String,
    /// Postgres URL; `None` switches the datastore to its in-memory fallback.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub provider: ProviderSettings,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    /// Access-token lifetime in minutes.
    pub token_ttl_minutes: i64,
    pub debug: bool,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub seasons: SeasonThresholds,
    /// Admin account created at startup when running without Postgres.
    pub seed_admin_email: Option<String>,
    pub seed_admin_password: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server_addr: "127.0.0.1:8000".into(),
            database_url: None,
            database_max_connections: 5,
            provider: ProviderSettings::default(),
            jwt_secret: String::new(),
            jwt_algorithm: Algorithm::HS256,
            token_ttl_minutes: 60 * 24,
            debug: false,
            log_level: "info".into(),
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://localhost:5173".into(),
            ],
            seasons: SeasonThresholds::default(),
            seed_admin_email: None,
            seed_admin_password: None,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    var(key).and_then(|v| v.parse::<T>().ok())
}

/// Boolean env value: `true/false`, `1/0`, `yes/no` or `on/off`, any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Read settings from the process environment (call `dotenvy` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::MissingEnv("JWT_SECRET"))?;

        // Tokens are signed with a shared secret, so only the HMAC family applies.
        let jwt_algorithm = match var("JWT_ALGORITHM") {
            Some(alg) => match alg.parse::<Algorithm>() {
                Ok(a @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => a,
                _ => return Err(ConfigError::Algorithm(alg)),
            },
            None => defaults.jwt_algorithm,
        };

        let provider = ProviderSettings {
            base_url: var("PROVIDER_BASE_URL").unwrap_or(defaults.provider.base_url),
            username: var("PROVIDER_USERNAME").unwrap_or_default(),
            password: var("PROVIDER_PASSWORD").unwrap_or_default(),
            timeout: parsed::<u64>("PROVIDER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider.timeout),
            lookup_timeout: parsed::<u64>("PROVIDER_LOOKUP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider.lookup_timeout),
        };

        let seasons = SeasonThresholds {
            current: parsed("SEASON_ID_CURRENT").unwrap_or(defaults.seasons.current),
            previous: parsed("SEASON_ID_PREVIOUS").unwrap_or(defaults.seasons.previous),
            base_year: parsed("SEASON_BASE_YEAR").unwrap_or(defaults.seasons.base_year),
        };

        let cors_origins = var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Ok(Settings {
            server_addr: var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            database_url: var("DATABASE_URL"),
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
            provider,
            jwt_secret,
            jwt_algorithm,
            token_ttl_minutes: parsed("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or(defaults.token_ttl_minutes),
            debug: var("DEBUG").and_then(|v| parse_flag(&v)).unwrap_or(false),
            log_level: var("LOG_LEVEL")
                .map(|l| l.to_lowercase())
                .unwrap_or(defaults.log_level),
            cors_origins,
            seasons,
            seed_admin_email: var("ADMIN_EMAIL"),
            seed_admin_password: var("ADMIN_PASSWORD"),
        })
    }

    /// Default `env_logger` filter: `debug` when DEBUG is on, else LOG_LEVEL.
    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}
