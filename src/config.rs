//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Database variable names keep the
//! `Postgres_*` spelling the deployment's `.env` files already use.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::domain::CacheKeying;

/// The store always runs on the local host.
pub const DATABASE_HOST: &str = "localhost";

/// User name used when `Postgres_user` is not set.
pub const DEFAULT_DATABASE_USER: &str = "acro0";

/// Connection settings for the PostgreSQL store.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database name. `None` lets the driver pick its default.
    pub name: Option<String>,
    /// Role to connect as.
    pub user: String,
    /// Password, if the role needs one.
    pub password: Option<String>,
    /// Host name of the store.
    pub host: String,
    /// TCP port of the store.
    pub port: u16,
    /// Connections opened eagerly and kept idle in the pool.
    pub min_connections: u32,
    /// Upper bound on live connections.
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Builds driver connect options from these settings.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .application_name(env!("CARGO_PKG_NAME"));
        if let Some(name) = &self.name {
            options = options.database(name);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        options
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection and pool settings.
    pub database: DatabaseConfig,

    /// How read results are keyed in the result cache.
    pub cache_keying: CacheKeying,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8000".to_string())
            .parse()?;

        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 20_u32);
        let max_connections = if max_connections == 0 { 20 } else { max_connections };
        let min_connections =
            parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 5_u32).min(max_connections);

        let database = DatabaseConfig {
            name: non_empty(lookup("Postgres_db")),
            user: non_empty(lookup("Postgres_user"))
                .unwrap_or_else(|| DEFAULT_DATABASE_USER.to_string()),
            password: non_empty(lookup("Postgres_passwd")),
            host: DATABASE_HOST.to_string(),
            port: parse_or(&lookup, "Postgres_port", 5432),
            min_connections,
            max_connections,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                30,
            )),
        };

        let cache_keying = parse_or(&lookup, "CACHE_KEYING", CacheKeying::default());

        Ok(Self {
            listen_addr,
            database,
            cache_keying,
        })
    }
}

/// Parses a looked-up value as `T`, returning `default` on missing or
/// invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Treats an empty variable the same as an unset one.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> GatewayConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let Ok(config) = GatewayConfig::from_lookup(|key| map.get(key).cloned()) else {
            panic!("config should load");
        };
        config
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]);
        assert_eq!(config.listen_addr.port(), 8000);
        assert_eq!(config.database.user, "acro0");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.min_connections, 5);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(30));
        assert!(config.database.name.is_none());
        assert!(config.database.password.is_none());
        assert_eq!(config.cache_keying, CacheKeying::QueryText);
    }

    #[test]
    fn reads_postgres_variables() {
        let config = load(&[
            ("Postgres_db", "TestDB"),
            ("Postgres_user", "hr"),
            ("Postgres_passwd", "secret"),
            ("Postgres_port", "6543"),
            ("CACHE_KEYING", "query_params"),
        ]);
        assert_eq!(config.database.name.as_deref(), Some("TestDB"));
        assert_eq!(config.database.user, "hr");
        assert_eq!(config.database.password.as_deref(), Some("secret"));
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.cache_keying, CacheKeying::QueryAndParams);
    }

    #[test]
    fn empty_user_falls_back_to_default() {
        let config = load(&[("Postgres_user", "")]);
        assert_eq!(config.database.user, "acro0");
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let config = load(&[("Postgres_port", "not-a-port")]);
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn zero_max_connections_falls_back_to_default() {
        let config = load(&[
            ("DATABASE_MIN_CONNECTIONS", "0"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 0);
    }

    #[test]
    fn min_connections_is_capped_at_max() {
        let config = load(&[
            ("DATABASE_MIN_CONNECTIONS", "30"),
            ("DATABASE_MAX_CONNECTIONS", "8"),
        ]);
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.database.min_connections, 8);
    }

    #[test]
    fn invalid_listen_addr_is_an_error() {
        let result = GatewayConfig::from_lookup(|key| {
            (key == "LISTEN_ADDR").then(|| "nowhere".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = load(&[("Postgres_passwd", "hunter2")]);
        let rendered = format!("{:?}", config.database);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
