//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Endpoints are mounted at the root. With the `swagger-ui` feature the
//! OpenAPI document is served at `/openapi.json` and browsable at `/docs`.

pub mod dto;
pub mod handlers;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "employee-gateway"),
    paths(
        handlers::employees::list_user_data,
        handlers::employees::update_user_data,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::EmployeeListResponse,
        dto::HireDateUpdateResponse,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "Employees", description = "Employee listing and updates"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = handlers::routes();

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()),
    );

    router
}

/// Builds the served application: routes, request tracing, permissive
/// CORS, and the shared state.
pub fn app(state: AppState) -> Router {
    build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
