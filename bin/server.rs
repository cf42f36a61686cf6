// Bank Accounts - Web Server
// REST API for accounts and transactions with Axum

use anyhow::{Context, Result};
use bank_accounts::api::{router, AppState};
use bank_accounts::{init_logging, open_database, Config, TransactionRegistry, TransactionService};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let address = config.socket_addr()?;
    init_logging(config.log_level);

    info!(version = bank_accounts::VERSION, "starting bank accounts server");

    let conn = open_database(&config.database_path)
        .with_context(|| format!("Failed to open database: {}", config.database_path))?;
    info!(path = %config.database_path, "database opened");

    // Registry is built once and shared read-only by every request
    let registry = TransactionRegistry::with_builtin()?;
    info!(types = ?registry.transaction_types(), "transaction types registered");

    let state = AppState::new(conn, TransactionService::new(registry));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    info!(%address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
