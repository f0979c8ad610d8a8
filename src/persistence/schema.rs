//! Employees table schema, seed data and the statements the gateway
//! issues.
//!
//! The setup program drives these functions over a single
//! [`PgConnection`], one statement at a time. Each statement commits on
//! its own.

use chrono::NaiveDate;
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};

use super::row::{RowMap, row_to_map};
use crate::config::DatabaseConfig;
use crate::error::GatewayError;

/// Creates the employees table when it does not exist yet.
pub const CREATE_EMPLOYEES_TABLE: &str = "CREATE TABLE IF NOT EXISTS public.employees (
    id SERIAL PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    hire_date DATE NOT NULL
)";

/// Reads the whole table. The store query is never paginated.
pub const LIST_EMPLOYEES: &str = "SELECT * FROM public.employees ORDER BY id";

/// Sets `hire_date` (`$1`) on the row whose email is `$2`.
pub const TOUCH_HIRE_DATE: &str = "UPDATE public.employees SET hire_date = $1 WHERE email = $2";

/// A row inserted by [`seed_employees`].
#[derive(Debug, Clone, Copy)]
pub struct SeedEmployee {
    /// Given name.
    pub first_name: &'static str,
    /// Family name.
    pub last_name: &'static str,
    /// Unique email address.
    pub email: &'static str,
    /// Hire date as `YYYY-MM-DD`.
    pub hire_date: &'static str,
}

/// Rows the setup program inserts. Re-running the seed leaves existing
/// emails untouched.
pub const SEED_EMPLOYEES: &[SeedEmployee] = &[
    SeedEmployee {
        first_name: "Daniel",
        last_name: "Anderson",
        email: "daniel.anderson@example.com",
        hire_date: "2023-11-25",
    },
    SeedEmployee {
        first_name: "Olivia",
        last_name: "Martinez",
        email: "olivia.martinez@example.com",
        hire_date: "2023-12-05",
    },
    SeedEmployee {
        first_name: "James",
        last_name: "Rodriguez",
        email: "james.rodriguez@example.com",
        hire_date: "2024-01-10",
    },
    SeedEmployee {
        first_name: "Sophia",
        last_name: "Garcia",
        email: "sophia.garcia@example.com",
        hire_date: "2024-02-15",
    },
    SeedEmployee {
        first_name: "Matthew",
        last_name: "Lee",
        email: "matthew.lee@example.com",
        hire_date: "2024-03-20",
    },
];

impl SeedEmployee {
    /// Parses [`SeedEmployee::hire_date`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the date is malformed.
    pub fn parsed_hire_date(&self) -> Result<NaiveDate, GatewayError> {
        NaiveDate::parse_from_str(self.hire_date, "%Y-%m-%d").map_err(|e| {
            GatewayError::Internal(format!("bad seed date {}: {e}", self.hire_date))
        })
    }
}

/// Opens a single connection to the store.
///
/// # Errors
///
/// Returns [`GatewayError::Connection`] if the store is unreachable or
/// rejects the credentials.
pub async fn connect(config: &DatabaseConfig) -> Result<PgConnection, GatewayError> {
    PgConnection::connect_with(&config.connect_options())
        .await
        .map_err(|e| GatewayError::Connection(e.to_string()))
}

/// Creates the employees table if needed.
///
/// # Errors
///
/// Returns [`GatewayError::Query`] on database failure.
pub async fn ensure_schema(conn: &mut PgConnection) -> Result<(), GatewayError> {
    sqlx::query(CREATE_EMPLOYEES_TABLE).execute(&mut *conn).await?;
    tracing::info!("employees table ready");
    Ok(())
}

/// Inserts [`SEED_EMPLOYEES`], skipping emails that already exist.
///
/// Returns the number of rows actually inserted.
///
/// # Errors
///
/// Returns [`GatewayError::Query`] on database failure.
pub async fn seed_employees(conn: &mut PgConnection) -> Result<u64, GatewayError> {
    let rows = SEED_EMPLOYEES
        .iter()
        .map(|e| e.parsed_hire_date().map(|date| (*e, date)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("INSERT INTO public.employees (first_name, last_name, email, hire_date) ");
    builder.push_values(rows, |mut b, (employee, hire_date)| {
        b.push_bind(employee.first_name)
            .push_bind(employee.last_name)
            .push_bind(employee.email)
            .push_bind(hire_date);
    });
    builder.push(" ON CONFLICT (email) DO NOTHING");

    let result = builder.build().execute(&mut *conn).await?;
    let inserted = result.rows_affected();
    tracing::info!(inserted, "seed rows applied");
    Ok(inserted)
}

/// Reads every employee row.
///
/// # Errors
///
/// Returns [`GatewayError::Query`] on database failure.
pub async fn fetch_employees(conn: &mut PgConnection) -> Result<Vec<RowMap>, GatewayError> {
    let rows = sqlx::query(LIST_EMPLOYEES).fetch_all(&mut *conn).await?;
    tracing::info!(rows = rows.len(), "read query executed");
    rows.iter().map(row_to_map).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seed_dates_parse() {
        for employee in SEED_EMPLOYEES {
            assert!(employee.parsed_hire_date().is_ok(), "{}", employee.email);
        }
    }

    #[test]
    fn seed_emails_are_unique() {
        let emails: HashSet<&str> = SEED_EMPLOYEES.iter().map(|e| e.email).collect();
        assert_eq!(emails.len(), SEED_EMPLOYEES.len());
    }

    #[test]
    fn malformed_seed_date_is_rejected() {
        let employee = SeedEmployee {
            first_name: "Ada",
            last_name: "Byron",
            email: "ada@example.com",
            hire_date: "2024-13-40",
        };
        assert!(matches!(
            employee.parsed_hire_date(),
            Err(GatewayError::Internal(_))
        ));
    }

    #[test]
    fn update_statement_is_parameterized() {
        assert!(TOUCH_HIRE_DATE.contains("$1"));
        assert!(TOUCH_HIRE_DATE.contains("$2"));
        assert!(!LIST_EMPLOYEES.contains('$'));
    }
}
