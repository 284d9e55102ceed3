use std::str::FromStr;
use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running on a workstation next to
/// the dashboard dev server. Override via environment variables or `.env`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// SQLite connection string.
    pub database_url: String,
    /// Broadcast loop and snapshot settings.
    pub monitor: MonitorConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Tunables for the sampling pipeline and history storage.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Sleep between broadcast cycles.
    pub interval: Duration,
    /// Outbound queue length per subscriber before it counts as stuck.
    pub subscriber_buffer: usize,
    /// Minimum gap between two stored snapshots.
    pub snapshot_interval: Duration,
    /// Snapshots older than this are purged by the retention job.
    pub snapshot_retention_hours: i64,
    /// Default page size for `GET /history`.
    pub history_limit: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            subscriber_buffer: 32,
            snapshot_interval: Duration::from_secs(10),
            snapshot_retention_hours: 168,
            history_limit: 50,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                          |
    /// |----------------------------|--------------------------------------------------|
    /// | `HOST`                     | `0.0.0.0`                                        |
    /// | `PORT`                     | `8000`                                           |
    /// | `CORS_ORIGINS`             | `http://localhost:3000,http://127.0.0.1:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `10`                                             |
    /// | `DATABASE_URL`             | `sqlite://kernel_monitor.db?mode=rwc`            |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but does not parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 8000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://kernel_monitor.db?mode=rwc".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 10),
            database_url,
            monitor: MonitorConfig::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }
}

impl MonitorConfig {
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `MONITOR_INTERVAL_SECS`     | `2`     |
    /// | `SUBSCRIBER_BUFFER`         | `32`    |
    /// | `SNAPSHOT_INTERVAL_SECS`    | `10`    |
    /// | `SNAPSHOT_RETENTION_HOURS`  | `168`   |
    /// | `HISTORY_LIMIT`             | `50`    |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let subscriber_buffer: usize = env_or("SUBSCRIBER_BUFFER", defaults.subscriber_buffer);
        assert!(subscriber_buffer > 0, "SUBSCRIBER_BUFFER must be at least 1");

        Self {
            interval: Duration::from_secs(env_or(
                "MONITOR_INTERVAL_SECS",
                defaults.interval.as_secs(),
            )),
            subscriber_buffer,
            snapshot_interval: Duration::from_secs(env_or(
                "SNAPSHOT_INTERVAL_SECS",
                defaults.snapshot_interval.as_secs(),
            )),
            snapshot_retention_hours: env_or(
                "SNAPSHOT_RETENTION_HOURS",
                defaults.snapshot_retention_hours,
            ),
            history_limit: env_or("HISTORY_LIMIT", defaults.history_limit),
        }
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
