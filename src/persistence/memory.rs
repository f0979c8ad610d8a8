//! In-memory employees table behind the [`QueryExecutor`] seam.
//!
//! [`MemoryExecutor`] understands the two statements the employee service
//! issues: the full-table read and the hire-date update. It counts every
//! call so tests can observe how often the store was reached, and can be
//! switched into a failing mode to exercise error paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::executor::{QueryExecutor, SqlParam};
use super::row::RowMap;
use super::schema::SEED_EMPLOYEES;
use crate::error::GatewayError;

/// Employees table held in memory.
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    rows: Mutex<Vec<RowMap>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryExecutor {
    /// Creates an executor holding the given rows.
    #[must_use]
    pub fn new(rows: Vec<RowMap>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// Creates an executor holding the seed employees with ids `1..=5`.
    #[must_use]
    pub fn seeded() -> Self {
        let rows = SEED_EMPLOYEES
            .iter()
            .zip(1_i64..)
            .map(|(employee, id)| {
                let mut row = RowMap::new();
                row.insert("id".to_string(), Value::from(id));
                row.insert("first_name".to_string(), Value::from(employee.first_name));
                row.insert("last_name".to_string(), Value::from(employee.last_name));
                row.insert("email".to_string(), Value::from(employee.email));
                row.insert("hire_date".to_string(), Value::from(employee.hire_date));
                row
            })
            .collect();
        Self::new(rows)
    }

    /// Number of reads served so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of writes served so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every following call fail with [`GatewayError::Query`] until
    /// switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_failing(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Query("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn read(
        &self,
        statement: &str,
        _params: &[SqlParam],
    ) -> Result<Vec<RowMap>, GatewayError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        if !statement.trim_start().to_ascii_uppercase().starts_with("SELECT") {
            return Err(GatewayError::Query(format!("not a read statement: {statement}")));
        }
        Ok(self.rows.lock().await.clone())
    }

    async fn write(&self, statement: &str, params: &[SqlParam]) -> Result<u64, GatewayError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let [SqlParam::Date(hire_date), SqlParam::Text(email)] = params else {
            return Err(GatewayError::Query(format!(
                "unsupported write statement: {statement}"
            )));
        };

        let mut rows = self.rows.lock().await;
        let mut affected = 0;
        for row in rows
            .iter_mut()
            .filter(|row| row.get("email").and_then(Value::as_str) == Some(email.as_str()))
        {
            row.insert("hire_date".to_string(), Value::String(hire_date.to_string()));
            affected += 1;
        }
        Ok(affected)
    }
}
