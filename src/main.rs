use dotenvy::dotenv;
use shopkeeper::{config, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// One synchronous user action at a time; a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
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

    // 3. Load the store configuration
    let store_config = config::catalog::load_default_config()?;
    info!("Successfully processed store configuration.");

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed reference categories (if necessary)
    config::catalog::seed_categories(&db, &store_config)
        .await
        .inspect_err(|e| error!("Failed to seed categories: {e}"))?;

    info!(
        low_stock_threshold = store_config.inventory.low_stock_threshold,
        "Store database ready."
    );

    Ok(())
}
