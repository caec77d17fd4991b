//! PostgreSQL storage integration tests using testcontainers.
//!
//! Run with: cargo test --test storage_postgres --features postgres -- --nocapture
//!
//! These tests spin up PostgreSQL in a container using testcontainers-rs,
//! create the schema, and run the SalesStore contract against it.

mod storage;

use std::time::Duration;

use salesdash::interfaces::SalesStore;
use salesdash::storage::PostgresSalesStore;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    GenericImage, ImageExt,
};

/// Start PostgreSQL container.
///
/// Returns (container, connection_string) where connection_string is suitable
/// for sqlx PgPool connection.
async fn start_postgres() -> (testcontainers::ContainerAsync<GenericImage>, String) {
    // PostgreSQL prints "database system is ready to accept connections" twice:
    // once during initial setup and once when fully ready.
    let image = GenericImage::new("postgres", "16")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stdout(
            "database system is ready to accept connections",
        ));

    let container = image
        .with_env_var("POSTGRES_USER", "sales")
        .with_env_var("POSTGRES_PASSWORD", "sales")
        .with_env_var("POSTGRES_DB", "sales_dashboard")
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("Failed to start postgres container");

    // Brief delay to ensure PostgreSQL is fully ready to accept connections
    tokio::time::sleep(Duration::from_secs(1)).await;

    let host_port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get mapped port");

    let host = container
        .get_host()
        .await
        .expect("Failed to get container host");

    let connection_string = format!(
        "postgres://sales:sales@{}:{}/sales_dashboard",
        host, host_port
    );

    println!("PostgreSQL available at: {}", connection_string);

    (container, connection_string)
}

#[tokio::test]
async fn test_postgres_sales_store() {
    println!("=== PostgreSQL SalesStore Tests ===");
    println!("Starting PostgreSQL container...");

    let (_container, connection_string) = start_postgres().await;
    let pool = sqlx::PgPool::connect(&connection_string)
        .await
        .expect("Failed to connect to PostgreSQL");
    let store = PostgresSalesStore::new(pool);
    store.init_schema().await.expect("Failed to init schema");

    println!("Running SalesStore tests...");
    run_sales_store_tests!(&store);

    println!("=== All PostgreSQL SalesStore tests PASSED ===");
    // Container is dropped here, stopping PostgreSQL
}
