//! Persistence layer: PostgreSQL pool lifecycle, query execution and
//! schema setup.
//!
//! The [`QueryExecutor`] trait is the seam between request handling and
//! the store. [`PgExecutor`] runs statements over connections checked out
//! of a [`PoolManager`]. With the `test-util` feature, `MemoryExecutor`
//! keeps the employees table in memory for tests.

pub mod executor;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod pool;
pub mod row;
pub mod schema;

pub use executor::{PgExecutor, QueryExecutor, SqlParam};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryExecutor;
pub use pool::{PoolManager, PoolState};
pub use row::RowMap;
