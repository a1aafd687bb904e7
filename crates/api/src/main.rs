use anyhow::Result;
use tracing::info;

use watcha_bringin_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    middleware::logging::init_logging(&config.logging);

    info!("Starting Watcha Bringin API v{}", env!("CARGO_PKG_VERSION"));

    // Install the Prometheus recorder before traffic arrives
    middleware::init_metrics();

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;

    let app = app::create_app(config.clone(), pool);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
