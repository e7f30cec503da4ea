use anyhow::Result;
use chrono::Local;
use tracing::{info, Level};

use budget_tracker_backend::{app_router, config::AppConfig, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = AppConfig::from_env();
    info!("Starting budget tracker backend");

    let state = initialize_backend(&config).await?;

    // Catch up on recurring transactions that came due while the service
    // was down.
    let generated = state
        .recurring_service
        .process_all(Local::now().date_naive())
        .await?;
    if generated > 0 {
        info!("Issued {} recurring transaction(s) at startup", generated);
    }

    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
