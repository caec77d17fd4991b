//! PostgreSQL implementation of SalesStore.
//!
//! Measures are `NUMERIC` columns; sqlx decodes them straight into
//! `rust_decimal::Decimal`, so aggregates never pass through floats.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_query::PostgresQueryBuilder;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::query::{self, EngineValues};
use super::schema::{sales_ddl, CREATE_SALES_TABLE_POSTGRES};
use crate::analytics::{
    CategoryTotals, CustomerTotals, ProductTotals, RegionTotals, SalesSummary, StoreInfo,
};
use crate::interfaces::sales_store::{Result, SalesStore};
use crate::model::SalesRecord;

/// PostgreSQL-backed sales store.
pub struct PostgresSalesStore {
    pool: PgPool,
}

impl PostgresSalesStore {
    /// Create a new PostgreSQL sales store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for PostgresSalesStore {
    fn engine(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn init_schema(&self) -> Result<()> {
        for ddl in sales_ddl(CREATE_SALES_TABLE_POSTGRES) {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        // TRUNCATE is transactional in PostgreSQL; a failure rolls back on drop.
        let mut tx = self.pool.begin().await?;
        sqlx::query("TRUNCATE TABLE sales RESTART IDENTITY CASCADE")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_batch(&self, records: &[SalesRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let sql = query::insert_records(records, encode)?.to_string(PostgresQueryBuilder);

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
        let sql = query::all_records().to_string(PostgresQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn summary(&self) -> Result<SalesSummary> {
        let sql = query::summary().to_string(PostgresQueryBuilder);
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;

        Ok(SalesSummary {
            total_sales: decimal(&row, query::TOTAL_SALES)?,
            total_profit: decimal(&row, query::TOTAL_PROFIT)?,
            total_quantity: int_or_zero(&row, query::TOTAL_QUANTITY)?,
            unique_orders: row.try_get(query::UNIQUE_ORDERS)?,
            unique_customers: row.try_get(query::UNIQUE_CUSTOMERS)?,
        })
    }

    async fn by_category(&self) -> Result<Vec<CategoryTotals>> {
        let sql = query::by_category().to_string(PostgresQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(CategoryTotals {
                    category: text(row, "category")?,
                    total_sales: decimal(row, query::TOTAL_SALES)?,
                    total_profit: decimal(row, query::TOTAL_PROFIT)?,
                    total_quantity: int_or_zero(row, query::TOTAL_QUANTITY)?,
                })
            })
            .collect()
    }

    async fn by_region(&self) -> Result<Vec<RegionTotals>> {
        let sql = query::by_region().to_string(PostgresQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(RegionTotals {
                    region: text(row, "region")?,
                    total_sales: decimal(row, query::TOTAL_SALES)?,
                    total_profit: decimal(row, query::TOTAL_PROFIT)?,
                })
            })
            .collect()
    }

    async fn top_customers(&self, limit: u64) -> Result<Vec<CustomerTotals>> {
        let sql = query::top_customers(limit).to_string(PostgresQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(CustomerTotals {
                    customer_id: text(row, "customer_id")?,
                    customer_name: text(row, "customer_name")?,
                    total_spent: decimal(row, query::TOTAL_SPENT)?,
                    total_orders: row.try_get(query::TOTAL_ORDERS)?,
                })
            })
            .collect()
    }

    async fn top_products(&self, limit: u64) -> Result<Vec<ProductTotals>> {
        let sql = query::top_products(limit).to_string(PostgresQueryBuilder);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(ProductTotals {
                    product_id: text(row, "product_id")?,
                    product_name: text(row, "product_name")?,
                    total_sales: decimal(row, query::TOTAL_SALES)?,
                    total_quantity: int_or_zero(row, query::TOTAL_QUANTITY)?,
                })
            })
            .collect()
    }

    async fn info(&self) -> Result<StoreInfo> {
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&self.pool)
            .await?;

        let table_size: String =
            sqlx::query_scalar("SELECT pg_size_pretty(pg_total_relation_size('sales'))")
                .fetch_one(&self.pool)
                .await?;

        let since = Utc::now() - Duration::hours(1);
        let recent_activity: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales WHERE created_at >= $1 OR updated_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreInfo {
            engine: self.engine(),
            version,
            record_count: self.count().await?,
            table_size,
            recent_activity,
        })
    }
}

fn encode(record: &SalesRecord) -> Result<EngineValues> {
    Ok(EngineValues {
        id: record.id.to_string().into(),
        sales: record.sales.into(),
        discount: record.discount.into(),
        profit: record.profit.into(),
        created_at: record.created_at.into(),
        updated_at: record.updated_at.into(),
    })
}

fn record_from_row(row: &PgRow) -> Result<SalesRecord> {
    Ok(SalesRecord {
        id: row.try_get("id")?,
        no: row.try_get("no")?,
        row_id: row.try_get("row_id")?,
        order_id: row.try_get("order_id")?,
        order_date: row.try_get("order_date")?,
        ship_date: row.try_get("ship_date")?,
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
        sales: decimal(row, "sales")?,
        quantity: row.try_get::<Option<i32>, _>("quantity")?.unwrap_or(0),
        discount: decimal(row, "discount")?,
        profit: decimal(row, "profit")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn text(row: &PgRow, column: &str) -> Result<String> {
    Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
}

fn int_or_zero(row: &PgRow, column: &str) -> Result<i64> {
    Ok(row.try_get::<Option<i64>, _>(column)?.unwrap_or(0))
}

fn decimal(row: &PgRow, column: &str) -> Result<Decimal> {
    Ok(row.try_get::<Option<Decimal>, _>(column)?.unwrap_or_default())
}
