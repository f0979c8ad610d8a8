//! # employee-gateway
//!
//! REST gateway over a PostgreSQL `employees` table.
//!
//! The service exposes a paginated listing and a hire-date update. Reads
//! go through a read-through result cache that any successful write
//! clears in full. A companion `employee-setup` binary creates and seeds
//! the table.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── EmployeeService (service/)
//!     │
//!     ├── ResultCache, paginate (domain/)
//!     │
//!     ├── QueryExecutor → PoolManager (persistence/)
//!     │
//!     └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod telemetry;
