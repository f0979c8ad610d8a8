//! Parameterized statement execution over pooled connections.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;

use super::pool::PoolManager;
use super::row::{RowMap, row_to_map};
use crate::error::GatewayError;

/// A positional bind parameter (`$1`, `$2`, ...).
///
/// Values always travel as bind parameters and are never spliced into the
/// statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// `text` value.
    Text(String),
    /// `int8` value.
    Int(i64),
    /// `date` value.
    Date(NaiveDate),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "date '{v}'"),
        }
    }
}

/// Executes read and write statements against the employee store.
#[async_trait]
pub trait QueryExecutor: Send + Sync + fmt::Debug {
    /// Runs a read statement and returns every row as a [`RowMap`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] without a pool and
    /// [`GatewayError::Query`] on any execution fault.
    async fn read(&self, statement: &str, params: &[SqlParam])
    -> Result<Vec<RowMap>, GatewayError>;

    /// Runs a write statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] without a pool and
    /// [`GatewayError::Query`] on any execution fault.
    async fn write(&self, statement: &str, params: &[SqlParam]) -> Result<u64, GatewayError>;
}

/// [`QueryExecutor`] backed by the PostgreSQL pool.
///
/// Each call checks out one connection for its whole duration. The
/// connection guard is dropped before the call returns, whether the
/// statement succeeded or not.
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: Arc<PoolManager>,
}

impl PgExecutor {
    /// Creates an executor over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PoolManager>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn read(
        &self,
        statement: &str,
        params: &[SqlParam],
    ) -> Result<Vec<RowMap>, GatewayError> {
        let mut conn = self.pool.acquire().await?;
        let rows = bind_params(sqlx::query(statement), params)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "read query failed");
                GatewayError::from(e)
            })?;
        drop(conn);

        tracing::info!(rows = rows.len(), "read query executed");
        rows.iter().map(row_to_map).collect()
    }

    async fn write(&self, statement: &str, params: &[SqlParam]) -> Result<u64, GatewayError> {
        let mut conn = self.pool.acquire().await?;
        let result = bind_params(sqlx::query(statement), params)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "write query failed");
                GatewayError::from(e)
            })?;

        let affected = result.rows_affected();
        tracing::info!(affected, "write query executed");
        Ok(affected)
    }
}

/// Binds every parameter to the query in order.
fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Date(v) => query.bind(*v),
        };
    }
    query
}
