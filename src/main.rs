//! employee-gateway server entry point.
//!
//! Opens the connection pool and starts the Axum HTTP server. A failed
//! pool is logged and the server starts anyway, reporting the database as
//! disconnected on `/health`.

use std::sync::Arc;

use employee_gateway::api;
use employee_gateway::app_state::AppState;
use employee_gateway::config::GatewayConfig;
use employee_gateway::domain::ResultCache;
use employee_gateway::persistence::{PgExecutor, PoolManager};
use employee_gateway::service::EmployeeService;
use employee_gateway::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    telemetry::init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting employee-gateway");

    // Build persistence layer
    let pool = match PoolManager::initialize(&config.database).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "database unavailable, serving without a pool");
            PoolManager::disconnected()
        }
    };
    let pool = Arc::new(pool);
    let executor = Arc::new(PgExecutor::new(Arc::clone(&pool)));

    // Build service layer
    let cache = Arc::new(ResultCache::new(config.cache_keying));
    tracing::info!(keying = %cache.keying(), "result cache ready");
    let employees = EmployeeService::new(executor, cache);

    // Build application state
    let app_state = AppState {
        pool: Arc::clone(&pool),
        employees,
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, api::app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.shutdown().await;
    tracing::info!("server stopped");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
