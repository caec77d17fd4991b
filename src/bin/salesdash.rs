//! salesdash: sales analytics REST API
//!
//! ## Architecture
//! ```text
//! [CSV feed] -> [Loader] -> [PostgreSQL/SQLite] <- [Query layer] <- [REST API :5000]
//! ```
//!
//! ## Configuration
//! - `--config <path>` or SALESDASH_CONFIG: YAML config file
//! - SALESDASH__<SECTION>__<KEY>: any config value
//! - DATABASE_URL / DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASSWORD: PostgreSQL
//! - CSV_URL: feed loaded by `POST /api/data/load`
//! - PORT: REST API port (default: 5000)
//! - FRONTEND_URL: extra allowed CORS origin
//! - SALESDASH_LOG: log filter (default: info)

use tracing::{error, info};

use salesdash::api::{self, AppState};
use salesdash::config::Config;
use salesdash::loader::Loader;
use salesdash::storage::init_storage;
use salesdash::utils::bootstrap::{init_tracing, parse_config_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        storage = %config.storage.storage_type,
        port = config.server.port,
        "starting salesdash"
    );

    let store = init_storage(&config.storage).await.map_err(|e| {
        error!(error = %e, "failed to initialize storage");
        e
    })?;

    let loader = Loader::new(store.clone(), config.loader.clone())?;

    api::serve(AppState::new(store, loader), &config.server).await
}
