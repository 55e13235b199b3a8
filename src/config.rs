use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service runs against the in-process store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,

    pub directory_seed_path: Option<String>,

    // Public rating submissions
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: non_empty("JWT_SECRET").context("JWT_SECRET must be set")?,

            directory_seed_path: non_empty("DIRECTORY_SEED_PATH"),

            rate_limit_max: parse_or("RATE_LIMIT_MAX", 10)?,
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 60)?,
        })
    }

    /// Configuration for tests and local tooling: in-process store, no seed.
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            database_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: jwt_secret.into(),
            directory_seed_path: None,
            rate_limit_max: 10,
            rate_limit_window_secs: 60,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be a number: {}", key, e)),
        None => Ok(default),
    }
}
