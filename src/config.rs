use std::time::Duration;

use chrono_tz::Tz;

use crate::types::region::Region;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API Key set")]
    MissingApiKey,
    #[error("No DATABASE_URL set")]
    MissingDatabaseUrl,
    #[error("Invalid DAY_TIME_ZONE: {0}")]
    InvalidTimeZone(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_key: Option<String>,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub inactive_after: Duration,
    pub query_timeout: Duration,
    /// Zone whose calendar day "today" refers to.
    pub day_time_zone: Tz,
    pub region: Region,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            api_key: None,
            database_url: None,
            database_max_connections: 10,
            inactive_after: Duration::from_secs(30 * 60),
            query_timeout: Duration::from_secs(10),
            day_time_zone: chrono_tz::Europe::Berlin,
            region: Region::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let api_key = std::env::var("API_KEY").ok().filter(|s| !s.is_empty());
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.database_max_connections);

        let inactive_after_minutes: u64 = std::env::var("INACTIVE_AFTER_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let query_timeout_seconds = std::env::var("QUERY_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let day_time_zone = match std::env::var("DAY_TIME_ZONE") {
            Ok(raw) => match parse_time_zone(&raw) {
                Ok(tz) => tz,
                Err(err) => {
                    tracing::warn!("{}, falling back to {}", err, defaults.day_time_zone);
                    defaults.day_time_zone
                }
            },
            Err(_) => defaults.day_time_zone,
        };

        Self {
            port,
            api_key,
            database_url,
            database_max_connections,
            inactive_after: Duration::from_secs(inactive_after_minutes * 60),
            query_timeout: Duration::from_secs(query_timeout_seconds),
            day_time_zone,
            region: Region::default(),
        }
    }

    /// Startup check: the service refuses to run without a shared secret
    /// or a position database.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => {}
            _ => return Err(ConfigError::MissingApiKey),
        }
        match self.database_url.as_deref() {
            Some(url) if !url.is_empty() => Ok(()),
            _ => Err(ConfigError::MissingDatabaseUrl),
        }
    }
}

pub fn parse_time_zone(raw: &str) -> Result<Tz, ConfigError> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimeZone(raw.to_string()))
}
