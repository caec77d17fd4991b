//! Aggregate analytics over the sales table.
//!
//! The store computes every aggregate in exact decimal arithmetic; the types
//! here carry those exact values and only turn them into floats when they are
//! serialized for the JSON API.

use rust_decimal::Decimal;
use serde::Serialize;

/// Number of customers/products returned when the caller gives no limit.
pub const DEFAULT_LIMIT: u64 = 10;

/// Totals across the whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_profit: Decimal,
    #[serde(rename = "total_quantity_sold")]
    pub total_quantity: i64,
    #[serde(rename = "total_unique_orders")]
    pub unique_orders: i64,
    #[serde(rename = "total_unique_customers")]
    pub unique_customers: i64,
}

/// Sales, profit and quantity for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_profit: Decimal,
    #[serde(rename = "total_quantity_sold")]
    pub total_quantity: i64,
}

/// Sales and profit for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTotals {
    pub region: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_profit: Decimal,
}

/// Spend and order count for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotals {
    pub customer_id: String,
    pub customer_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    pub total_orders: i64,
}

/// Sales and quantity for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotals {
    pub product_id: String,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    #[serde(rename = "total_quantity_sold")]
    pub total_quantity: i64,
}

/// Store diagnostics for `/api/database/info`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreInfo {
    /// Engine name, e.g. "PostgreSQL".
    pub engine: &'static str,
    /// Engine version string as reported by the server.
    pub version: String,
    pub record_count: i64,
    /// Human-readable on-disk size of the sales table.
    pub table_size: String,
    /// Rows created or updated during the last hour.
    pub recent_activity: i64,
}

/// Parse the `limit` query parameter.
///
/// Anything that is not a non-negative integer falls back to [`DEFAULT_LIMIT`].
pub fn parse_limit(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_LIMIT)
}
