use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use emr_core::CoreConfig;
use emr_core::config::{busy_timeout_from_env_value, database_path_from_env_value};

/// Main entry point for the EMR server
///
/// Creates the database schema if needed, then serves the REST API until Ctrl-C.
/// The diagnosis catalog is not seeded here; run `emr seed` first.
///
/// # Environment Variables
/// - `EMR_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `EMR_DATABASE_PATH`: SQLite database file (default: "emr.db")
/// - `EMR_CORS_ORIGINS`: comma-separated allowed origins (default: local frontend dev servers)
/// - `EMR_BUSY_TIMEOUT_MS`: how long a connection waits on a locked database (default: 5000)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("emr=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("EMR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let cfg = Arc::new(CoreConfig::new(
        database_path_from_env_value(std::env::var("EMR_DATABASE_PATH").ok()),
        busy_timeout_from_env_value(std::env::var("EMR_BUSY_TIMEOUT_MS").ok())?,
    )?);
    let cors_origins = cors_origins_from_env_value(std::env::var("EMR_CORS_ORIGINS").ok());

    let state = AppState::new(cfg.clone());
    state
        .service()
        .database()
        .initialise()
        .with_context(|| format!("initialising {}", cfg.database_path().display()))?;

    let cors = api_rest::cors_layer(&cors_origins).context("parsing EMR_CORS_ORIGINS")?;
    let app = api_rest::router(state).layer(cors);

    tracing::info!("++ Using database {}", cfg.database_path().display());
    tracing::info!("++ Starting EMR REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .with_context(|| format!("binding {rest_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- EMR REST stopped");
    Ok(())
}

/// Split `EMR_CORS_ORIGINS` into origins, ignoring blank entries.
fn cors_origins_from_env_value(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
