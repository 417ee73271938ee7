use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context};
use axum::http::HeaderValue;
use sqlx::sqlite::SqliteConnectOptions;
use tracing::info;
use url::Url;

use crate::geofence::{Geofence, Point, DEFAULT_CENTER, DEFAULT_RADIUS_KM, DEFAULT_REGION_NAME};

const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
const SQLITE_FILE_NAME: &str = "data.db";

/// Backing store picked from `DATABASE_URL`
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    Postgres(String),
    Sqlite(SqliteConnectOptions),
    /// `DATABASE_URL=memory`: nothing survives a restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseTarget,
    pub host: String,
    pub port: u16,
    pub debug_mode: bool,
    pub allowed_origins: Option<Vec<String>>,
    pub skip_migrations: bool,
    pub upstream_api_url: Option<Url>,
    pub static_dir: Option<PathBuf>,
    pub max_body_bytes: usize,
    pub geofence: Geofence,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let upstream_api_url = match get("UPSTREAM_API_URL") {
            Some(raw) => Some(
                Url::parse(raw.trim_end_matches('/'))
                    .with_context(|| format!("UPSTREAM_API_URL is not a valid URL: {raw}"))?,
            ),
            None => None,
        };

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(raw) => Some(parse_origins(&raw)?),
            None => None,
        };

        let geofence = Geofence {
            name: get("GEOFENCE_NAME").unwrap_or_else(|| DEFAULT_REGION_NAME.to_string()),
            center: Point {
                lat: parse_or(&get, "GEOFENCE_CENTER_LAT", DEFAULT_CENTER.lat)?,
                lng: parse_or(&get, "GEOFENCE_CENTER_LNG", DEFAULT_CENTER.lng)?,
            },
            radius_km: parse_or(&get, "GEOFENCE_RADIUS_KM", DEFAULT_RADIUS_KM)?,
        };
        if !(geofence.radius_km.is_finite() && geofence.radius_km > 0.0) {
            return Err(anyhow!("GEOFENCE_RADIUS_KM must be a positive number"));
        }
        let center = geofence.center;
        if !(center.lat.is_finite() && center.lat.abs() <= 90.0) {
            return Err(anyhow!("GEOFENCE_CENTER_LAT must be between -90 and 90"));
        }
        if !(center.lng.is_finite() && center.lng.abs() <= 180.0) {
            return Err(anyhow!("GEOFENCE_CENTER_LNG must be between -180 and 180"));
        }

        let database = match get("DATABASE_URL") {
            Some(url) => database_target(&url)?,
            None => {
                let dir = get("DB_DIR").unwrap_or_else(|| ".".to_string());
                let path = PathBuf::from(dir).join(SQLITE_FILE_NAME);
                info!("DATABASE_URL not set, using SQLite file {}", path.display());
                DatabaseTarget::Sqlite(
                    SqliteConnectOptions::new()
                        .filename(path)
                        .create_if_missing(true),
                )
            }
        };

        Ok(Self {
            database,
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "PORT", 5000u16)?,
            debug_mode: flag(get("DEBUG_MODE")),
            allowed_origins,
            skip_migrations: flag(get("SKIP_MIGRATIONS")),
            upstream_api_url,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            max_body_bytes: parse_or(&get, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            geofence,
        })
    }
}

fn database_target(url: &str) -> anyhow::Result<DatabaseTarget> {
    if url.eq_ignore_ascii_case("memory") {
        Ok(DatabaseTarget::Memory)
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(DatabaseTarget::Postgres(url.to_string()))
    } else if url.starts_with("sqlite:") {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("DATABASE_URL is not a valid SQLite URL: {url}"))?;
        Ok(DatabaseTarget::Sqlite(options.create_if_missing(true)))
    } else {
        Err(anyhow!(
            "DATABASE_URL must start with postgres://, postgresql:// or sqlite:, or be 'memory'"
        ))
    }
}

/// Comma separated list; an entry that is not a valid header value, or a list
/// with no entries at all, is rejected.
fn parse_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.is_empty() {
        return Err(anyhow!("ALLOWED_ORIGINS does not name any origin: '{raw}'"));
    }
    for origin in &origins {
        HeaderValue::from_str(origin)
            .with_context(|| format!("ALLOWED_ORIGINS contains an invalid origin: {origin}"))?;
    }
    Ok(origins)
}

fn flag(value: Option<String>) -> bool {
    value
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        match &config.database {
            DatabaseTarget::Sqlite(options) => {
                assert_eq!(options.get_filename(), std::path::Path::new("./data.db"))
            }
            other => panic!("expected the SQLite default, got {other:?}"),
        }
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert!(!config.debug_mode);
        assert!(config.allowed_origins.is_none());
        assert!(config.upstream_api_url.is_none());
        assert_eq!(config.max_body_bytes, 8 * 1024 * 1024);
        assert_eq!(config.geofence, Geofence::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/rescue"),
            ("PORT", "8080"),
            ("DEBUG_MODE", "TRUE"),
            ("SKIP_MIGRATIONS", "1"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("UPSTREAM_API_URL", "https://api.example.com/"),
            ("GEOFENCE_NAME", "Bohol"),
            ("GEOFENCE_RADIUS_KM", "60"),
        ])
        .unwrap();

        assert!(matches!(
            &config.database,
            DatabaseTarget::Postgres(url) if url == "postgres://localhost/rescue"
        ));
        assert_eq!(config.port, 8080);
        assert!(config.debug_mode);
        assert!(config.skip_migrations);
        assert_eq!(
            config.allowed_origins,
            Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
        );
        assert_eq!(
            config.upstream_api_url.map(|u| u.to_string()),
            Some("https://api.example.com/".to_string())
        );
        assert_eq!(config.geofence.name, "Bohol");
        assert_eq!(config.geofence.radius_km, 60.0);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("DATABASE_URL", "  "), ("PORT", "")]).unwrap();
        assert!(matches!(config.database, DatabaseTarget::Sqlite(_)));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn picks_the_store_from_database_url() {
        let config = config_from(&[("DB_DIR", "/var/lib/rescue")]).unwrap();
        match &config.database {
            DatabaseTarget::Sqlite(options) => assert_eq!(
                options.get_filename(),
                std::path::Path::new("/var/lib/rescue/data.db")
            ),
            other => panic!("expected SQLite, got {other:?}"),
        }

        let config = config_from(&[("DATABASE_URL", "sqlite://rescue.db")]).unwrap();
        assert!(matches!(config.database, DatabaseTarget::Sqlite(_)));

        let config = config_from(&[("DATABASE_URL", "postgresql://db/rescue")]).unwrap();
        assert!(matches!(config.database, DatabaseTarget::Postgres(_)));

        let config = config_from(&[("DATABASE_URL", "memory")]).unwrap();
        assert!(matches!(config.database, DatabaseTarget::Memory));

        assert!(config_from(&[("DATABASE_URL", "mysql://db/rescue")]).is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("GEOFENCE_RADIUS_KM", "-3")]).is_err());
        assert!(config_from(&[("UPSTREAM_API_URL", "not a url")]).is_err());

        assert!(config_from(&[("GEOFENCE_CENTER_LAT", "NaN")]).is_err());
        assert!(config_from(&[("GEOFENCE_CENTER_LAT", "inf")]).is_err());
        assert!(config_from(&[("GEOFENCE_CENTER_LAT", "90.5")]).is_err());
        assert!(config_from(&[("GEOFENCE_CENTER_LNG", "999")]).is_err());
        assert!(config_from(&[("GEOFENCE_CENTER_LNG", "-inf")]).is_err());
        assert!(config_from(&[("GEOFENCE_CENTER_LAT", "-90"), ("GEOFENCE_CENTER_LNG", "180")]).is_ok());

        assert!(config_from(&[("ALLOWED_ORIGINS", ",, ,")]).is_err());
        assert!(config_from(&[("ALLOWED_ORIGINS", "https://ok.example,bad\u{7f}origin")]).is_err());
    }
}
