#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use std::sync::Arc;
use stock_buddy::{
    config::{self, database},
    core::{auth, seed},
    errors::Result,
    web::{self, AppState},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Connect to the database and make sure every table exists
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the initial catalog and drop stale sessions
    seed::seed_catalog(&db, &app_config.seed)
        .await
        .inspect_err(|e| error!("Failed to seed initial catalog: {}", e))?;
    let purged = auth::purge_expired_sessions(&db).await?;
    if purged > 0 {
        info!("Removed {} expired sessions.", purged);
    }

    // 6. Serve HTTP until Ctrl-C
    let bind_address = app_config.server.bind_address.clone();
    let state = AppState {
        db,
        config: Arc::new(app_config),
    };
    web::serve(state, &bind_address)
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    Ok(())
}
