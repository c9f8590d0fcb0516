use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use room_monitor_service::{api, config::Config, db, sensors::PgReadingStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env; a missing file is fine, env vars may be set externally
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    // Connect to DB and make sure the sensors table exists
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    info!(
        max_connections = config.database.max_connections,
        "Database ready"
    );

    let store = Arc::new(PgReadingStore::new(pool));

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, cors = config.cors_enabled, "HTTP server listening");

    axum::serve(listener, api::router(store, config.cors_enabled))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
