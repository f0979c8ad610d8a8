//! Employee DTOs for the list and update endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::persistence::RowMap;

/// Query parameters for `GET /user_data`.
///
/// No bounds are enforced; out-of-range values produce empty or partial
/// pages.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Rows to skip. Negative values count back from the end. Defaults to 0.
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows to return. Defaults to 20.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Query parameters for `PUT /user_data_update/{user_email}`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateParams {
    /// Echoed back in the response; has no effect on the update.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

/// Response body for `GET /user_data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeListResponse {
    /// Rows inside the requested window.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<RowMap>,
    /// Number of rows in the whole table.
    pub total: usize,
    /// Requested skip, echoed.
    pub skip: i64,
    /// Requested limit, echoed.
    pub limit: i64,
    /// Number of rows in `data`.
    pub returned: usize,
}

/// Response body for `PUT /user_data_update/{user_email}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HireDateUpdateResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Rows changed by the update. Zero when the email is unknown.
    pub affected_rows: u64,
    /// Email from the request path.
    pub user_email: String,
    /// The hire date written, as `YYYY-MM-DD`.
    pub new_hire_date: String,
    /// `limit` query parameter, echoed.
    pub limit: i64,
}
