//! Storage implementations.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{StorageConfig, StorageType};
use crate::interfaces::SalesStore;

pub mod query;
pub mod schema;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSalesStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresSalesStore;

/// Error returned while connecting a store.
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Initialize storage based on configuration.
///
/// Connects the configured backend and creates the sales table and its
/// indexes if they don't exist yet.
pub async fn init_storage(config: &StorageConfig) -> Result<Arc<dyn SalesStore>, InitError> {
    let store: Arc<dyn SalesStore> = match config.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            info!(path = %config.sqlite_path, "storage: sqlite");
            let pool = connect_sqlite(&config.sqlite_path, config.max_connections).await?;
            Arc::new(SqliteSalesStore::new(pool))
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            info!(host = %config.host, database = %config.name, "storage: postgres");
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.postgres_url())
                .await?;
            Arc::new(PostgresSalesStore::new(pool))
        }
        #[allow(unreachable_patterns)]
        other => {
            error!("Storage type '{}' requested but its feature is not enabled", other);
            return Err(format!("{} feature not enabled", other).into());
        }
    };

    store.init_schema().await?;
    Ok(store)
}

/// Open a SQLite pool at `path`, creating the file and its directory.
///
/// `":memory:"` opens a private in-memory database; the pool is then pinned
/// to a single connection so every query sees the same data.
#[cfg(feature = "sqlite")]
pub async fn connect_sqlite(
    path: &str,
    max_connections: u32,
) -> Result<sqlx::SqlitePool, InitError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::time::Duration;

    let in_memory = path == ":memory:";

    let mut opts = SqliteConnectOptions::new()
        .filename(path)
        .busy_timeout(Duration::from_secs(30))
        .create_if_missing(true);

    if in_memory {
        return Ok(SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?);
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    opts = opts.journal_mode(SqliteJournalMode::Wal);

    Ok(SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(opts)
        .await?)
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_storage_sqlite_memory() {
        let config = crate::config::Config::for_test().storage;
        let store = init_storage(&config).await.expect("init failed");

        assert_eq!(store.engine(), "SQLite");
        assert_eq!(store.count().await.expect("count failed"), 0);
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let config = crate::config::Config::for_test().storage;
        let store = init_storage(&config).await.expect("init failed");

        store.init_schema().await.expect("second init failed");
    }
}
