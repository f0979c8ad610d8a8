//! Employee handlers: paginated list and hire-date update.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::{EmployeeListResponse, HireDateUpdateResponse, ListParams, UpdateParams};
use crate::app_state::AppState;
use crate::domain::paginate;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /user_data` — List employees with offset/limit pagination.
///
/// The whole table is loaded through the result cache and the window is
/// cut in memory.
///
/// # Errors
///
/// Returns [`GatewayError`] if the table cannot be read.
#[utoipa::path(
    get,
    path = "/user_data",
    tag = "Employees",
    summary = "List employees",
    description = "Returns a window of the employees table. The table is read through the query cache and sliced in memory; out-of-range windows return fewer or no rows.",
    params(ListParams),
    responses(
        (status = 200, description = "Employee page", body = EmployeeListResponse),
        (status = 500, description = "Database unavailable or query failed", body = ErrorResponse),
    )
)]
pub async fn list_user_data(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<EmployeeListResponse>, GatewayError> {
    let rows = state.employees.list_employees().await?;
    let page = paginate(rows.as_slice(), params.skip, params.limit);

    Ok(Json(EmployeeListResponse {
        data: page.to_vec(),
        total: rows.len(),
        skip: params.skip,
        limit: params.limit,
        returned: page.len(),
    }))
}

/// `PUT /user_data_update/{user_email}` — Set an employee's hire date to
/// today.
///
/// An unknown email is not an error: the response reports zero affected
/// rows.
///
/// # Errors
///
/// Returns [`GatewayError`] if the update fails.
#[utoipa::path(
    put,
    path = "/user_data_update/{user_email}",
    tag = "Employees",
    summary = "Touch hire date",
    description = "Sets hire_date to the current date for the employee with the given email and clears the query cache.",
    params(
        ("user_email" = String, Path, description = "User email to update"),
        UpdateParams,
    ),
    responses(
        (status = 200, description = "Update applied", body = HireDateUpdateResponse),
        (status = 500, description = "Database unavailable or query failed", body = ErrorResponse),
    )
)]
pub async fn update_user_data(
    State(state): State<AppState>,
    Path(user_email): Path<String>,
    Query(params): Query<UpdateParams>,
) -> Result<Json<HireDateUpdateResponse>, GatewayError> {
    let update = state.employees.touch_hire_date(&user_email).await?;

    Ok(Json(HireDateUpdateResponse {
        message: "User data updated successfully".to_string(),
        affected_rows: update.affected_rows,
        user_email,
        new_hire_date: update.hire_date.to_string(),
        limit: params.limit,
    }))
}

/// Employee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user_data", get(list_user_data))
        .route("/user_data_update/{user_email}", put(update_user_data))
}
