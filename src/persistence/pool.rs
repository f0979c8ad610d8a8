//! Connection pool lifecycle.
//!
//! [`PoolManager`] owns the `sqlx::PgPool` and tracks its lifecycle:
//! `Uninitialized → Ready → Draining → Closed`. Lifecycle transitions and
//! liveness reads go through the same [`tokio::sync::RwLock`], so a health
//! check never observes a half-closed pool as connected.

use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use tokio::sync::RwLock;

use crate::config::DatabaseConfig;
use crate::error::GatewayError;

/// Lifecycle state of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// No pool was ever established.
    Uninitialized,
    /// The pool is serving connections.
    Ready,
    /// Shutdown has started; new acquires are refused.
    Draining,
    /// All connections are closed.
    Closed,
}

/// Owner of the process-wide PostgreSQL connection pool.
///
/// Created once at startup and shared through [`crate::app_state::AppState`].
/// Connections are handed out as [`PoolConnection`] guards that return to
/// the pool when dropped, on every exit path.
#[derive(Debug)]
pub struct PoolManager {
    pool: Option<PgPool>,
    state: RwLock<PoolState>,
}

impl PoolManager {
    /// Opens the pool and verifies that the store accepts a connection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Connection`] if the store is unreachable or
    /// rejects the credentials, or if `max_connections` is zero.
    pub async fn initialize(config: &DatabaseConfig) -> Result<Self, GatewayError> {
        if config.max_connections == 0 {
            return Err(GatewayError::Connection("max_connections is zero".to_string()));
        }

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            min_connections = config.min_connections,
            max_connections = config.max_connections,
            "connection pool established"
        );
        Ok(Self::from_pool(pool))
    }

    /// Wraps an already-built pool. The manager starts out `Ready`.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Some(pool),
            state: RwLock::new(PoolState::Ready),
        }
    }

    /// Creates a manager with no pool, used when startup initialization
    /// failed. Every acquire fails with [`GatewayError::Unavailable`].
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            pool: None,
            state: RwLock::new(PoolState::Uninitialized),
        }
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> PoolState {
        *self.state.read().await
    }

    /// Returns `true` while the pool is `Ready`. No round-trip is made to
    /// the store.
    pub async fn is_connected(&self) -> bool {
        let state = self.state.read().await;
        *state == PoolState::Ready && self.pool.as_ref().is_some_and(|p| !p.is_closed())
    }

    /// Checks out a connection, waiting while every connection is busy and
    /// the pool is at its maximum size.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] when the pool is not `Ready`,
    /// or [`GatewayError::Query`] when the acquire times out or a new
    /// connection cannot be opened.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, GatewayError> {
        let pool = {
            let state = self.state.read().await;
            match (&self.pool, *state) {
                (Some(pool), PoolState::Ready) => pool.clone(),
                _ => return Err(GatewayError::Unavailable),
            }
        };
        pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "failed to acquire connection");
            GatewayError::from(e)
        })
    }

    /// Number of live connections, idle or checked out.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.pool.as_ref().map_or(0, PgPool::size)
    }

    /// Closes every connection. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        {
            let mut state = self.state.write().await;
            match *state {
                PoolState::Ready => *state = PoolState::Draining,
                PoolState::Uninitialized => {
                    *state = PoolState::Closed;
                    return;
                }
                PoolState::Draining | PoolState::Closed => return,
            }
        }

        if let Some(pool) = &self.pool {
            pool.close().await;
        }

        *self.state.write().await = PoolState::Closed;
        tracing::info!("connection pool closed");
    }
}
