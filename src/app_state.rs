//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::PoolManager;
use crate::service::EmployeeService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool, consulted directly by the health check.
    pub pool: Arc<PoolManager>,
    /// Employee service for all business logic.
    pub employees: EmployeeService,
}
