use std::{env, fmt::Display, str::FromStr};

use derive_more::Display;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Display)]
pub enum ConfigError {
    #[display(fmt = "environment variable '{}' must be set", _0)]
    Missing(&'static str),

    #[display(fmt = "environment variable '{}' is invalid: {}", _0, _1)]
    Invalid(&'static str, String),
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Session cookies carry the `Secure` flag when set.
    pub secure_cookies: bool,
    pub protected_paths: Vec<String>,
    pub login_path: String,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let storage: StorageKind = parse_or("STORAGE", "postgres")?;
        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
        let protected_paths = env::var("PROTECTED_PATHS")
            .map(|v| split_paths(&v))
            .unwrap_or_else(|_| default_protected_paths());

        Ok(Self {
            jwt_secret,
            storage,
            database_url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", "5")?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", "8080")?,
            secure_cookies: app_env != "development",
            protected_paths,
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
            bcrypt_cost: parse_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())?,
        })
    }

    /// Configuration for local development runs and tests: in-memory
    /// storage, insecure cookies and the cheapest bcrypt cost.
    pub fn development(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            storage: StorageKind::Memory,
            database_url: None,
            max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 8080,
            secure_cookies: false,
            protected_paths: default_protected_paths(),
            login_path: "/login".to_string(),
            bcrypt_cost: 4,
        }
    }
}

fn default_protected_paths() -> Vec<String> {
    vec!["/profile".to_string(), "/events".to_string(), "/create-event".to_string()]
}

fn split_paths(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse().map_err(|e: T::Err| {
        warn!("invalid {key} value: {e}");
        ConfigError::Invalid(key, e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_kind_parses_known_backends() {
        assert_eq!("postgres".parse::<StorageKind>(), Ok(StorageKind::Postgres));
        assert_eq!(" Memory ".parse::<StorageKind>(), Ok(StorageKind::Memory));
        assert!("mongo".parse::<StorageKind>().is_err());
    }

    #[test]
    fn protected_paths_are_trimmed_and_non_empty() {
        assert_eq!(
            split_paths(" /profile, ,/events ,"),
            vec!["/profile".to_string(), "/events".to_string()]
        );
    }

    #[test]
    fn development_config_disables_secure_cookies() {
        let config = Config::development("secret");
        assert!(!config.secure_cookies);
        assert_eq!(config.storage, StorageKind::Memory);
        assert!(config.protected_paths.contains(&"/events".to_string()));
    }
}
