use anyhow::{Context, Result};
use tracing::info;

use team_manager_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load().context("Failed to load configuration")?;

    middleware::logging::init_logging(&config.logging)
        .context("Failed to initialize logging")?;
    middleware::init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting Team Manager API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let addr = config
        .socket_addr()
        .context("Invalid server host or port")?;
    let app = app::create_app(config, pool);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
