//! Service layer: business logic orchestration.
//!
//! [`EmployeeService`] composes the [`crate::persistence::QueryExecutor`]
//! with the [`crate::domain::ResultCache`] for the employee operations.

pub mod employee_service;

pub use employee_service::{EmployeeService, HireDateUpdate};
