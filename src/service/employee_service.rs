//! Employee service: cached reads and cache-clearing writes.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::domain::{CachedRows, ResultCache};
use crate::error::GatewayError;
use crate::persistence::schema::{LIST_EMPLOYEES, TOUCH_HIRE_DATE};
use crate::persistence::{QueryExecutor, SqlParam};

/// Outcome of a hire-date update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HireDateUpdate {
    /// Rows the update touched. Zero when no employee has the email.
    pub affected_rows: u64,
    /// The hire date that was written.
    pub hire_date: NaiveDate,
}

/// Orchestration layer for employee operations.
///
/// Reads go through the [`ResultCache`]; every successful write clears it.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    executor: Arc<dyn QueryExecutor>,
    cache: Arc<ResultCache>,
}

impl EmployeeService {
    /// Creates a new `EmployeeService`.
    #[must_use]
    pub fn new(executor: Arc<dyn QueryExecutor>, cache: Arc<ResultCache>) -> Self {
        Self { executor, cache }
    }

    /// Returns a reference to the inner [`ResultCache`].
    #[must_use]
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Returns every employee row, from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the rows are not cached and the read
    /// fails.
    pub async fn list_employees(&self) -> Result<CachedRows, GatewayError> {
        self.cache
            .get_or_load(self.executor.as_ref(), LIST_EMPLOYEES, &[])
            .await
    }

    /// Sets the hire date of the employee with `email` to today's local
    /// date.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the update fails.
    pub async fn touch_hire_date(&self, email: &str) -> Result<HireDateUpdate, GatewayError> {
        self.set_hire_date(email, Local::now().date_naive()).await
    }

    /// Sets the hire date of the employee with `email`.
    ///
    /// The cache is cleared after the write succeeds, even when no row
    /// matched.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the update fails. The cache is left
    /// untouched in that case.
    pub async fn set_hire_date(
        &self,
        email: &str,
        hire_date: NaiveDate,
    ) -> Result<HireDateUpdate, GatewayError> {
        let params = [SqlParam::Date(hire_date), SqlParam::Text(email.to_string())];
        let affected_rows = self.executor.write(TOUCH_HIRE_DATE, &params).await?;

        self.cache.invalidate_all().await;

        tracing::info!(email, affected_rows, %hire_date, "hire date updated");
        Ok(HireDateUpdate {
            affected_rows,
            hire_date,
        })
    }
}
