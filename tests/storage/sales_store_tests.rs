//! SalesStore interface tests.
//!
//! These tests verify the contract of the SalesStore trait.
//! Each storage implementation should run these tests on an empty,
//! initialized store.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use salesdash::interfaces::{SalesStore, StoreError};
use salesdash::model::SalesRecord;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Create a test record with the given row id.
pub fn make_record(row_id: i32, customer: &str, product: &str, sales: &str) -> SalesRecord {
    let mut record = SalesRecord::new(format!("ORD-{}", row_id), Utc::now());
    record.no = Some(row_id);
    record.row_id = Some(row_id);
    record.order_date = NaiveDate::from_ymd_opt(2016, 11, 8);
    record.ship_date = NaiveDate::from_ymd_opt(2016, 11, 11);
    record.ship_mode = "Second Class".to_string();
    record.customer_id = customer.to_string();
    record.customer_name = format!("Name of {}", customer);
    record.segment = "Consumer".to_string();
    record.country = "United States".to_string();
    record.city = "Henderson".to_string();
    record.state = "Kentucky".to_string();
    record.postal_code = "42420".to_string();
    record.region = if row_id % 2 == 0 { "East" } else { "West" }.to_string();
    record.product_id = product.to_string();
    record.category = "Furniture".to_string();
    record.sub_category = "Bookcases".to_string();
    record.product_name = format!("Name of {}", product);
    record.sales = dec(sales);
    record.quantity = row_id;
    record.discount = dec("0.2");
    record.profit = dec("-1.05");
    record
}

async fn reset<S: SalesStore>(store: &S) {
    store.clear().await.expect("clear should succeed");
}

// =============================================================================
// Write path
// =============================================================================

pub async fn test_insert_and_count<S: SalesStore>(store: &S) {
    reset(store).await;

    let records: Vec<_> = (1..=5)
        .map(|n| make_record(n, "C-1", "P-1", "10.00"))
        .collect();
    let inserted = store.insert_batch(&records).await.expect("insert should succeed");

    assert_eq!(inserted, 5);
    assert_eq!(store.count().await.unwrap(), 5);
}

pub async fn test_insert_empty_batch<S: SalesStore>(store: &S) {
    reset(store).await;

    assert_eq!(store.insert_batch(&[]).await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

pub async fn test_clear_removes_all<S: SalesStore>(store: &S) {
    reset(store).await;

    let records = vec![make_record(1, "C-1", "P-1", "1.00")];
    store.insert_batch(&records).await.unwrap();
    store.clear().await.expect("clear should succeed");

    assert_eq!(store.count().await.unwrap(), 0);
}

pub async fn test_duplicate_row_id_rejected<S: SalesStore>(store: &S) {
    reset(store).await;

    let records = vec![
        make_record(1, "C-1", "P-1", "1.00"),
        make_record(1, "C-2", "P-2", "2.00"),
    ];
    let result = store.insert_batch(&records).await;

    assert!(
        matches!(result, Err(StoreError::Rejected(_))),
        "duplicate row_id should be rejected, got {:?}",
        result
    );
    assert_eq!(store.count().await.unwrap(), 0, "batch must be all-or-nothing");
}

pub async fn test_round_trip_preserves_values<S: SalesStore>(store: &S) {
    reset(store).await;

    let mut record = make_record(7, "CG-12520", "FUR-BO-10001798", "261.96");
    record.ship_date = None;
    record.no = None;
    record.discount = dec("0.4500");
    store.insert_batch(std::slice::from_ref(&record)).await.unwrap();

    let all = store.all_records().await.unwrap();
    assert_eq!(all.len(), 1);

    let stored = &all[0];
    assert_eq!(stored.id, record.id);
    assert_eq!(stored.no, None);
    assert_eq!(stored.row_id, Some(7));
    assert_eq!(stored.order_id, "ORD-7");
    assert_eq!(stored.order_date, record.order_date);
    assert_eq!(stored.ship_date, None);
    assert_eq!(stored.customer_name, "Name of CG-12520");
    assert_eq!(stored.postal_code, "42420");
    assert_eq!(stored.sub_category, "Bookcases");
    assert_eq!(stored.sales, dec("261.96"));
    assert_eq!(stored.quantity, 7);
    assert_eq!(stored.discount, dec("0.45"));
    assert_eq!(stored.profit, dec("-1.05"));
}

pub async fn test_all_records_ordered<S: SalesStore>(store: &S) {
    reset(store).await;

    let records: Vec<_> = [3, 1, 2]
        .into_iter()
        .map(|n| make_record(n, "C-1", "P-1", "1.00"))
        .collect();
    store.insert_batch(&records).await.unwrap();

    let nos: Vec<_> = store
        .all_records()
        .await
        .unwrap()
        .iter()
        .map(|r| r.no)
        .collect();
    assert_eq!(nos, vec![Some(1), Some(2), Some(3)]);
}

// =============================================================================
// Aggregates
// =============================================================================

pub async fn test_summary_empty<S: SalesStore>(store: &S) {
    reset(store).await;

    let summary = store.summary().await.unwrap();
    assert_eq!(summary.total_sales, Decimal::ZERO);
    assert_eq!(summary.total_profit, Decimal::ZERO);
    assert_eq!(summary.total_quantity, 0);
    assert_eq!(summary.unique_orders, 0);
    assert_eq!(summary.unique_customers, 0);
}

pub async fn test_summary_exact<S: SalesStore>(store: &S) {
    reset(store).await;

    // 0.10 added many times drifts in binary floating point.
    let records: Vec<_> = (1..=30)
        .map(|n| make_record(n, &format!("C-{}", n % 4), "P-1", "0.10"))
        .collect();
    store.insert_batch(&records).await.unwrap();

    let summary = store.summary().await.unwrap();
    assert_eq!(summary.total_sales, dec("3.00"));
    assert_eq!(summary.total_profit, dec("-31.50"));
    assert_eq!(summary.total_quantity, (1..=30).sum::<i64>());
    assert_eq!(summary.unique_orders, 30);
    assert_eq!(summary.unique_customers, 4);
}

pub async fn test_by_category_and_region<S: SalesStore>(store: &S) {
    reset(store).await;

    let mut records = vec![
        make_record(1, "C-1", "P-1", "100.00"),
        make_record(2, "C-1", "P-2", "50.00"),
        make_record(3, "C-2", "P-3", "25.00"),
    ];
    records[2].category = "Technology".to_string();
    store.insert_batch(&records).await.unwrap();

    let categories = store.by_category().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].category, "Furniture");
    assert_eq!(categories[0].total_sales, dec("150.00"));
    assert_eq!(categories[0].total_quantity, 3);
    assert_eq!(categories[1].category, "Technology");

    let regions = store.by_region().await.unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].region, "West");
    assert_eq!(regions[0].total_sales, dec("125.00"));
    assert_eq!(regions[1].region, "East");
    assert_eq!(regions[1].total_profit, dec("-1.05"));
}

pub async fn test_top_customers<S: SalesStore>(store: &S) {
    reset(store).await;

    let records = vec![
        make_record(1, "C-1", "P-1", "10.00"),
        make_record(2, "C-1", "P-1", "10.00"),
        make_record(3, "C-2", "P-1", "30.00"),
        make_record(4, "C-3", "P-1", "5.00"),
    ];
    store.insert_batch(&records).await.unwrap();

    let top = store.top_customers(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].customer_id, "C-2");
    assert_eq!(top[0].total_spent, dec("30.00"));
    assert_eq!(top[0].total_orders, 1);
    assert_eq!(top[1].customer_id, "C-1");
    assert_eq!(top[1].customer_name, "Name of C-1");
    assert_eq!(top[1].total_orders, 2);

    assert!(store.top_customers(0).await.unwrap().is_empty());
    assert_eq!(store.top_customers(100).await.unwrap().len(), 3);
}

pub async fn test_top_products<S: SalesStore>(store: &S) {
    reset(store).await;

    let records = vec![
        make_record(1, "C-1", "P-1", "10.00"),
        make_record(2, "C-1", "P-2", "40.00"),
        make_record(3, "C-1", "P-1", "35.00"),
    ];
    store.insert_batch(&records).await.unwrap();

    let top = store.top_products(10).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].product_id, "P-1");
    assert_eq!(top[0].total_sales, dec("45.00"));
    assert_eq!(top[0].total_quantity, 4);
    assert_eq!(top[1].product_id, "P-2");
}

pub async fn test_info<S: SalesStore>(store: &S) {
    reset(store).await;

    let records = vec![make_record(1, "C-1", "P-1", "1.00")];
    store.insert_batch(&records).await.unwrap();

    let info = store.info().await.expect("info should succeed");
    assert_eq!(info.engine, store.engine());
    assert!(!info.version.is_empty());
    assert_eq!(info.record_count, 1);
    assert!(!info.table_size.is_empty());
    assert_eq!(info.recent_activity, 1);

    store.analyze().await.expect("analyze should succeed");
}

/// Macro to run all SalesStore tests against a store implementation.
#[macro_export]
macro_rules! run_sales_store_tests {
    ($store:expr) => {
        use $crate::storage::sales_store_tests::*;

        // write path
        test_insert_and_count($store).await;
        println!("  test_insert_and_count: PASSED");

        test_insert_empty_batch($store).await;
        println!("  test_insert_empty_batch: PASSED");

        test_clear_removes_all($store).await;
        println!("  test_clear_removes_all: PASSED");

        test_duplicate_row_id_rejected($store).await;
        println!("  test_duplicate_row_id_rejected: PASSED");

        test_round_trip_preserves_values($store).await;
        println!("  test_round_trip_preserves_values: PASSED");

        test_all_records_ordered($store).await;
        println!("  test_all_records_ordered: PASSED");

        // aggregates
        test_summary_empty($store).await;
        println!("  test_summary_empty: PASSED");

        test_summary_exact($store).await;
        println!("  test_summary_exact: PASSED");

        test_by_category_and_region($store).await;
        println!("  test_by_category_and_region: PASSED");

        test_top_customers($store).await;
        println!("  test_top_customers: PASSED");

        test_top_products($store).await;
        println!("  test_top_products: PASSED");

        test_info($store).await;
        println!("  test_info: PASSED");
    };
}
