//! employee-setup: creates and seeds the employees table, then prints it.
//!
//! Runs every statement in order over one connection. Exits with status 1
//! when the store cannot be reached; statement failures are logged and
//! the routine moves on.

use std::process::ExitCode;

use anyhow::Context;
use employee_gateway::config::GatewayConfig;
use employee_gateway::persistence::schema;
use employee_gateway::telemetry;
use sqlx::Connection;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    telemetry::init();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = ?err, "setup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut conn = match schema::connect(&config.database).await {
        Ok(conn) => conn,
        Err(err) => {
            tracing::error!(error = %err, "could not connect to PostgreSQL");
            return Ok(ExitCode::from(1));
        }
    };
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        "connection to PostgreSQL established"
    );

    if let Err(err) = schema::ensure_schema(&mut conn).await {
        tracing::error!(error = %err, "creating employees table failed");
    }

    match schema::seed_employees(&mut conn).await {
        Ok(inserted) => tracing::info!(inserted, "seed complete"),
        Err(err) => tracing::error!(error = %err, "seeding employees failed"),
    }

    match schema::fetch_employees(&mut conn).await {
        Ok(rows) => {
            println!("Operation success");
            for row in &rows {
                println!(
                    "{}",
                    serde_json::to_string(row).context("rendering employee row")?
                );
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "reading employees failed");
            println!("operation failed");
        }
    }

    conn.close().await.context("closing connection")?;
    tracing::info!("PostgreSQL connection closed");
    Ok(ExitCode::SUCCESS)
}
