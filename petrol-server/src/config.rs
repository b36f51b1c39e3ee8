//! Application configuration from environment variables.

use std::env::VarError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Where station rows are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSettings {
    Baserow {
        url: String,
        table_id: String,
        token: Option<String>,
    },
    Fixture(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub feed: FeedSettings,
    pub feed_timeout_secs: u64,
    pub station_cache_path: PathBuf,
    pub station_cache_ttl: Duration,
    pub station_refresh_interval: Duration,
    pub page_size: usize,
    pub query_cache_ttl: Duration,
    pub preferences_path: PathBuf,
    pub static_dir: PathBuf,
}

/// Load configuration, reading `.env` first if present.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Build configuration from an env-var lookup function.
///
/// Empty values count as unset. `STATION_FIXTURE` takes precedence over the
/// Baserow settings; without it `BASEROW_URL` and `BASEROW_TABLE_ID` are
/// required.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let bind_addr = or_default("BIND_ADDR", "127.0.0.1:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let feed = match optional("STATION_FIXTURE") {
        Some(path) => FeedSettings::Fixture(PathBuf::from(path)),
        None => FeedSettings::Baserow {
            url: require("BASEROW_URL")?,
            table_id: require("BASEROW_TABLE_ID")?,
            token: optional("BASEROW_TOKEN"),
        },
    };

    let page_size = parse_u64("PAGE_SIZE", "12")?;
    if page_size == 0 || page_size > 200 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PAGE_SIZE".to_string(),
            reason: "must be between 1 and 200".to_string(),
        });
    }

    let station_refresh_secs = parse_u64("STATION_REFRESH_SECS", "900")?;
    if station_refresh_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STATION_REFRESH_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        bind_addr,
        log_level: or_default("LOG_LEVEL", "info"),
        feed,
        feed_timeout_secs: parse_u64("FEED_TIMEOUT_SECS", "30")?,
        station_cache_path: PathBuf::from(or_default("STATION_CACHE_PATH", "stations_cache.json")),
        station_cache_ttl: Duration::from_secs(parse_u64("STATION_CACHE_TTL_SECS", "3600")?),
        station_refresh_interval: Duration::from_secs(station_refresh_secs),
        page_size: page_size as usize,
        query_cache_ttl: Duration::from_secs(parse_u64("QUERY_CACHE_TTL_SECS", "30")?),
        preferences_path: PathBuf::from(or_default("PREFERENCES_PATH", "preferences.json")),
        static_dir: PathBuf::from(or_default("STATIC_DIR", "static")),
    })
}
