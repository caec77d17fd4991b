//! SQLite storage integration tests.
//!
//! Run with: cargo test --test storage_sqlite --features sqlite
//!
//! Uses an in-memory database, no external dependencies required.

mod storage;

use salesdash::interfaces::SalesStore;
use salesdash::storage::{connect_sqlite, SqliteSalesStore};

#[tokio::test]
async fn test_sqlite_sales_store() {
    println!("=== SQLite SalesStore Tests ===");

    let pool = connect_sqlite(":memory:", 1)
        .await
        .expect("Failed to connect to SQLite");
    let store = SqliteSalesStore::new(pool);
    store.init_schema().await.expect("Failed to init schema");

    run_sales_store_tests!(&store);

    println!("=== All SQLite SalesStore tests PASSED ===");
}

#[tokio::test]
async fn test_sqlite_file_database() {
    let dir = std::env::temp_dir().join(format!("salesdash-test-{}", uuid::Uuid::new_v4()));
    let path = dir.join("nested").join("sales.db");

    let pool = connect_sqlite(path.to_str().unwrap(), 2)
        .await
        .expect("Failed to open SQLite file");
    let store = SqliteSalesStore::new(pool);
    store.init_schema().await.expect("Failed to init schema");

    assert!(path.exists());
    assert_eq!(store.count().await.unwrap(), 0);

    std::fs::remove_dir_all(&dir).ok();
}
