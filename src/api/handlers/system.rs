//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// `"connected"` while the pool is ready, `"disconnected"` otherwise.
    pub database: String,
}

/// `GET /health` — Service health status.
///
/// Reports pool state only; no query is sent to the store.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health and whether the database pool is connected. Does not query the database.",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let database = if state.pool.is_connected().await {
        "connected"
    } else {
        "disconnected"
    };
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            database: database.to_string(),
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::ResultCache;
    use crate::persistence::{MemoryExecutor, PoolManager, QueryExecutor};
    use crate::service::EmployeeService;

    fn make_state(pool: PoolManager) -> (AppState, Arc<MemoryExecutor>) {
        let executor = Arc::new(MemoryExecutor::seeded());
        let employees = EmployeeService::new(
            Arc::clone(&executor) as Arc<dyn QueryExecutor>,
            Arc::new(ResultCache::default()),
        );
        let state = AppState {
            pool: Arc::new(pool),
            employees,
        };
        (state, executor)
    }

    async fn get_health(state: AppState) -> Value {
        let Ok(request) = Request::builder().uri("/health").body(Body::empty()) else {
            panic!("valid request");
        };
        let response = routes()
            .with_state(state)
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        assert_eq!(response.status(), StatusCode::OK);
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("readable body");
        };
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }

    #[tokio::test]
    async fn reports_disconnected_without_pool() {
        let (state, executor) = make_state(PoolManager::disconnected());
        let body = get_health(state).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "disconnected");
        assert_eq!(executor.reads(), 0);
    }

    #[tokio::test]
    async fn reports_connected_without_touching_the_store() {
        let options = PgConnectOptions::new().host("localhost").port(5432);
        let pool = PoolManager::from_pool(PgPoolOptions::new().connect_lazy_with(options));
        let (state, executor) = make_state(pool);
        let body = get_health(state).await;

        assert_eq!(body["database"], "connected");
        assert_eq!(executor.reads(), 0);
    }

    #[tokio::test]
    async fn reports_disconnected_after_shutdown() {
        let options = PgConnectOptions::new().host("localhost").port(5432);
        let pool = PoolManager::from_pool(PgPoolOptions::new().connect_lazy_with(options));
        let (state, _) = make_state(pool);
        state.pool.shutdown().await;

        let body = get_health(state).await;
        assert_eq!(body["database"], "disconnected");
    }
}
