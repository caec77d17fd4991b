//! SQLite implementation of SalesStore.
//!
//! SQLite has no exact decimal type, so measures are stored as scaled
//! integers (hundredths for money, ten-thousandths for discount) and `SUM`
//! stays exact.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use sea_query::SqliteQueryBuilder;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::query::{self, EngineValues};
use super::schema::{sales_ddl, CREATE_SALES_TABLE_SQLITE};
use crate::analytics::{
    CategoryTotals, CustomerTotals, ProductTotals, RegionTotals, SalesSummary, StoreInfo,
};
use crate::interfaces::sales_store::{Result, SalesStore, StoreError};
use crate::model::{SalesRecord, DISCOUNT_SCALE, MONEY_SCALE};

/// SQLite-backed sales store.
pub struct SqliteSalesStore {
    pool: SqlitePool,
}

impl SqliteSalesStore {
    /// Create a new SQLite sales store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for SqliteSalesStore {
    fn engine(&self) -> &'static str {
        "SQLite"
    }

    async fn init_schema(&self) -> Result<()> {
        for ddl in sales_ddl(CREATE_SALES_TABLE_SQLITE) {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM sales").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_batch(&self, records: &[SalesRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let sql = query::insert_records(records, encode)?.to_string(SqliteQueryBuilder);

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&sql).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn analyze(&self) -> Result<()> {
        sqlx::query("ANALYZE sales").execute(&self.pool).await?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn all_records(&self) -> Result<Vec<SalesRecord>> {
        let sql = query::all_records().to_string(SqliteQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn summary(&self) -> Result<SalesSummary> {
        let sql = query::summary().to_string(SqliteQueryBuilder);
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;

        Ok(SalesSummary {
            total_sales: money(&row, query::TOTAL_SALES)?,
            total_profit: money(&row, query::TOTAL_PROFIT)?,
            total_quantity: int_or_zero(&row, query::TOTAL_QUANTITY)?,
            unique_orders: row.try_get(query::UNIQUE_ORDERS)?,
            unique_customers: row.try_get(query::UNIQUE_CUSTOMERS)?,
        })
    }

    async fn by_category(&self) -> Result<Vec<CategoryTotals>> {
        let sql = query::by_category().to_string(SqliteQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(CategoryTotals {
                    category: text(row, "category")?,
                    total_sales: money(row, query::TOTAL_SALES)?,
                    total_profit: money(row, query::TOTAL_PROFIT)?,
                    total_quantity: int_or_zero(row, query::TOTAL_QUANTITY)?,
                })
            })
            .collect()
    }

    async fn by_region(&self) -> Result<Vec<RegionTotals>> {
        let sql = query::by_region().to_string(SqliteQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(RegionTotals {
                    region: text(row, "region")?,
                    total_sales: money(row, query::TOTAL_SALES)?,
                    total_profit: money(row, query::TOTAL_PROFIT)?,
                })
            })
            .collect()
    }

    async fn top_customers(&self, limit: u64) -> Result<Vec<CustomerTotals>> {
        let sql = query::top_customers(limit).to_string(SqliteQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(CustomerTotals {
                    customer_id: text(row, "customer_id")?,
                    customer_name: text(row, "customer_name")?,
                    total_spent: money(row, query::TOTAL_SPENT)?,
                    total_orders: row.try_get(query::TOTAL_ORDERS)?,
                })
            })
            .collect()
    }

    async fn top_products(&self, limit: u64) -> Result<Vec<ProductTotals>> {
        let sql = query::top_products(limit).to_string(SqliteQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(ProductTotals {
                    product_id: text(row, "product_id")?,
                    product_name: text(row, "product_name")?,
                    total_sales: money(row, query::TOTAL_SALES)?,
                    total_quantity: int_or_zero(row, query::TOTAL_QUANTITY)?,
                })
            })
            .collect()
    }

    async fn info(&self) -> Result<StoreInfo> {
        let version: String = sqlx::query_scalar("SELECT sqlite_version()")
            .fetch_one(&self.pool)
            .await?;

        // SQLite keeps every table in one file; report the database size.
        let size: i64 = sqlx::query_scalar(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
        )
        .fetch_one(&self.pool)
        .await?;

        let since = timestamp(Utc::now() - Duration::hours(1));
        let recent_activity: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales WHERE created_at >= ?1 OR updated_at >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreInfo {
            engine: self.engine(),
            version,
            record_count: self.count().await?,
            table_size: pretty_size(size),
            recent_activity,
        })
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn encode(record: &SalesRecord) -> Result<EngineValues> {
    Ok(EngineValues {
        id: record.id.to_string().into(),
        sales: scaled(record.sales, MONEY_SCALE)?.into(),
        discount: scaled(record.discount, DISCOUNT_SCALE)?.into(),
        profit: scaled(record.profit, MONEY_SCALE)?.into(),
        created_at: timestamp(record.created_at).into(),
        updated_at: timestamp(record.updated_at).into(),
    })
}

/// Fixed-width RFC 3339 so stored timestamps compare as text.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decimal as an integer count of `10^-scale` units.
fn scaled(value: Decimal, scale: u32) -> Result<i64> {
    let mut value = value.round_dp(scale);
    value.rescale(scale);
    i64::try_from(value.mantissa())
        .map_err(|_| StoreError::Rejected(format!("value {} out of range", value)))
}

fn unscaled(units: i64, scale: u32) -> Decimal {
    Decimal::new(units, scale)
}

// ============================================================================
// Decoding
// ============================================================================

fn record_from_row(row: &SqliteRow) -> Result<SalesRecord> {
    let id: String = row.try_get("id")?;

    Ok(SalesRecord {
        id: Uuid::parse_str(&id).map_err(|e| StoreError::Decode(e.to_string()))?,
        no: row.try_get("no")?,
        row_id: row.try_get("row_id")?,
        order_id: row.try_get("order_id")?,
        order_date: date(row, "order_date")?,
        ship_date: date(row, "ship_date")?,
        ship_mode: text(row, "ship_mode")?,
        customer_id: text(row, "customer_id")?,
        customer_name: text(row, "customer_name")?,
        segment: text(row, "segment")?,
        country: text(row, "country")?,
        city: text(row, "city")?,
        state: text(row, "state")?,
        postal_code: text(row, "postal_code")?,
        region: text(row, "region")?,
        product_id: text(row, "product_id")?,
        category: text(row, "category")?,
        sub_category: text(row, "sub_category")?,
        product_name: text(row, "product_name")?,
        sales: money(row, "sales")?,
        quantity: row.try_get::<Option<i32>, _>("quantity")?.unwrap_or(0),
        discount: scaled_column(row, "discount", DISCOUNT_SCALE)?,
        profit: money(row, "profit")?,
        created_at: datetime(row, "created_at")?,
        updated_at: datetime(row, "updated_at")?,
    })
}

fn text(row: &SqliteRow, column: &str) -> Result<String> {
    Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
}

fn int_or_zero(row: &SqliteRow, column: &str) -> Result<i64> {
    Ok(row.try_get::<Option<i64>, _>(column)?.unwrap_or(0))
}

fn money(row: &SqliteRow, column: &str) -> Result<Decimal> {
    scaled_column(row, column, MONEY_SCALE)
}

fn scaled_column(row: &SqliteRow, column: &str, scale: u32) -> Result<Decimal> {
    Ok(unscaled(int_or_zero(row, column)?, scale))
}

fn date(row: &SqliteRow, column: &str) -> Result<Option<NaiveDate>> {
    row.try_get::<Option<String>, _>(column)?
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|e| StoreError::Decode(format!("{}: {}", column, e)))
        })
        .transpose()
}

fn datetime(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("{}: {}", column, e)))
}

/// Render a byte count the way PostgreSQL's `pg_size_pretty` does.
pub(crate) fn pretty_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["kB", "MB", "GB", "TB"];

    if bytes.abs() < 10 * 1024 {
        return format!("{} bytes", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value.abs() >= 10.0 * 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", value.round() as i64, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_scaled_rounds_to_column_scale() {
        assert_eq!(scaled(Decimal::from_str("261.96").unwrap(), 2).unwrap(), 26196);
        assert_eq!(scaled(Decimal::from_str("0.2").unwrap(), 4).unwrap(), 2000);
        assert_eq!(scaled(Decimal::from_str("-41.9136").unwrap(), 2).unwrap(), -4191);
        assert_eq!(scaled(Decimal::from_str("3").unwrap(), 2).unwrap(), 300);
    }

    #[test]
    fn test_unscaled_restores_decimal() {
        assert_eq!(unscaled(26196, 2), Decimal::from_str("261.96").unwrap());
        assert_eq!(unscaled(2000, 4), Decimal::from_str("0.2").unwrap());
    }

    #[test]
    fn test_pretty_size() {
        assert_eq!(pretty_size(8192), "8192 bytes");
        assert_eq!(pretty_size(20 * 1024), "20 kB");
        assert_eq!(pretty_size(15 * 1024 * 1024), "15 MB");
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        let a = timestamp(DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().into());
        let b = timestamp(
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00.5Z").unwrap().into(),
        );
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }
}
