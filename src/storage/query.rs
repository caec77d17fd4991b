//! Statement builders shared by the SQL backends.
//!
//! Each function returns an engine-neutral sea-query statement; backends
//! render it with their own query builder. Aggregates use output aliases so
//! row decoding is by name.

use sea_query::{Alias, Expr, Func, InsertStatement, Order, Query, SelectStatement, SimpleExpr};

use super::schema::{Sales, SALES_COLUMNS};
use crate::interfaces::sales_store::Result;
use crate::model::SalesRecord;

pub const TOTAL_SALES: &str = "total_sales";
pub const TOTAL_PROFIT: &str = "total_profit";
pub const TOTAL_QUANTITY: &str = "total_quantity";
pub const UNIQUE_ORDERS: &str = "unique_orders";
pub const UNIQUE_CUSTOMERS: &str = "unique_customers";
pub const TOTAL_SPENT: &str = "total_spent";
pub const TOTAL_ORDERS: &str = "total_orders";

/// Values whose encoding differs between engines.
///
/// Everything else in a record (text, integers, dates) encodes the same way
/// on every backend.
pub struct EngineValues {
    pub id: SimpleExpr,
    pub sales: SimpleExpr,
    pub discount: SimpleExpr,
    pub profit: SimpleExpr,
    pub created_at: SimpleExpr,
    pub updated_at: SimpleExpr,
}

/// Multi-row INSERT for `records`, in [`SALES_COLUMNS`] order.
///
/// `encode` supplies the engine-specific values for each record.
pub fn insert_records<F>(records: &[SalesRecord], encode: F) -> Result<InsertStatement>
where
    F: Fn(&SalesRecord) -> Result<EngineValues>,
{
    let mut stmt = Query::insert();
    stmt.into_table(Sales::Table).columns(SALES_COLUMNS);

    for record in records {
        let engine = encode(record)?;
        stmt.values_panic([
            engine.id,
            record.no.into(),
            record.row_id.into(),
            record.order_id.as_str().into(),
            record.order_date.into(),
            record.ship_date.into(),
            record.ship_mode.as_str().into(),
            record.customer_id.as_str().into(),
            record.customer_name.as_str().into(),
            record.segment.as_str().into(),
            record.country.as_str().into(),
            record.city.as_str().into(),
            record.state.as_str().into(),
            record.postal_code.as_str().into(),
            record.region.as_str().into(),
            record.product_id.as_str().into(),
            record.category.as_str().into(),
            record.sub_category.as_str().into(),
            record.product_name.as_str().into(),
            engine.sales,
            record.quantity.into(),
            engine.discount,
            engine.profit,
            engine.created_at,
            engine.updated_at,
        ]);
    }

    Ok(stmt)
}

/// Every record, ordered by `no` then `row_id`.
pub fn all_records() -> SelectStatement {
    Query::select()
        .columns(SALES_COLUMNS)
        .from(Sales::Table)
        .order_by(Sales::No, Order::Asc)
        .order_by(Sales::RowId, Order::Asc)
        .to_owned()
}

/// Whole-table totals.
pub fn summary() -> SelectStatement {
    Query::select()
        .expr_as(sum(Sales::Sales), Alias::new(TOTAL_SALES))
        .expr_as(sum(Sales::Profit), Alias::new(TOTAL_PROFIT))
        .expr_as(sum(Sales::Quantity), Alias::new(TOTAL_QUANTITY))
        .expr_as(count_distinct(Sales::OrderId), Alias::new(UNIQUE_ORDERS))
        .expr_as(count_distinct(Sales::CustomerId), Alias::new(UNIQUE_CUSTOMERS))
        .from(Sales::Table)
        .to_owned()
}

/// Totals grouped by category, highest sales first.
pub fn by_category() -> SelectStatement {
    Query::select()
        .column(Sales::Category)
        .expr_as(sum(Sales::Sales), Alias::new(TOTAL_SALES))
        .expr_as(sum(Sales::Profit), Alias::new(TOTAL_PROFIT))
        .expr_as(sum(Sales::Quantity), Alias::new(TOTAL_QUANTITY))
        .from(Sales::Table)
        .group_by_col(Sales::Category)
        .order_by(Alias::new(TOTAL_SALES), Order::Desc)
        .order_by(Sales::Category, Order::Asc)
        .to_owned()
}

/// Totals grouped by region, highest sales first.
pub fn by_region() -> SelectStatement {
    Query::select()
        .column(Sales::Region)
        .expr_as(sum(Sales::Sales), Alias::new(TOTAL_SALES))
        .expr_as(sum(Sales::Profit), Alias::new(TOTAL_PROFIT))
        .from(Sales::Table)
        .group_by_col(Sales::Region)
        .order_by(Alias::new(TOTAL_SALES), Order::Desc)
        .order_by(Sales::Region, Order::Asc)
        .to_owned()
}

/// Customers by spend, highest first.
pub fn top_customers(limit: u64) -> SelectStatement {
    Query::select()
        .column(Sales::CustomerId)
        .column(Sales::CustomerName)
        .expr_as(sum(Sales::Sales), Alias::new(TOTAL_SPENT))
        .expr_as(count_distinct(Sales::OrderId), Alias::new(TOTAL_ORDERS))
        .from(Sales::Table)
        .group_by_col(Sales::CustomerId)
        .group_by_col(Sales::CustomerName)
        .order_by(Alias::new(TOTAL_SPENT), Order::Desc)
        .order_by(Sales::CustomerId, Order::Asc)
        .limit(limit)
        .to_owned()
}

/// Products by sales, highest first.
pub fn top_products(limit: u64) -> SelectStatement {
    Query::select()
        .column(Sales::ProductId)
        .column(Sales::ProductName)
        .expr_as(sum(Sales::Sales), Alias::new(TOTAL_SALES))
        .expr_as(sum(Sales::Quantity), Alias::new(TOTAL_QUANTITY))
        .from(Sales::Table)
        .group_by_col(Sales::ProductId)
        .group_by_col(Sales::ProductName)
        .order_by(Alias::new(TOTAL_SALES), Order::Desc)
        .order_by(Sales::ProductId, Order::Asc)
        .limit(limit)
        .to_owned()
}

fn sum(column: Sales) -> SimpleExpr {
    Func::sum(Expr::col(column)).into()
}

fn count_distinct(column: Sales) -> SimpleExpr {
    Func::count_distinct(Expr::col(column)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{PostgresQueryBuilder, SqliteQueryBuilder};

    #[test]
    fn test_summary_counts_distinct_orders_and_customers() {
        let sql = summary().to_string(PostgresQueryBuilder);
        assert!(sql.contains(r#"COUNT(DISTINCT "order_id")"#), "{}", sql);
        assert!(sql.contains(r#"COUNT(DISTINCT "customer_id")"#), "{}", sql);
        assert!(sql.contains(r#"SUM("sales")"#), "{}", sql);

        let sql = summary().to_string(SqliteQueryBuilder);
        assert!(sql.contains(r#"COUNT(DISTINCT "order_id")"#), "{}", sql);
    }

    #[test]
    fn test_top_customers_orders_by_spend_and_limits() {
        let sql = top_customers(3).to_string(SqliteQueryBuilder);
        assert!(sql.contains(r#"GROUP BY "customer_id", "customer_name""#), "{}", sql);
        assert!(sql.contains(r#"ORDER BY "total_spent" DESC"#), "{}", sql);
        assert!(sql.ends_with("LIMIT 3"), "{}", sql);
    }

    #[test]
    fn test_insert_renders_one_tuple_per_record() {
        let now = chrono::Utc::now();
        let records = vec![SalesRecord::new("A-1", now), SalesRecord::new("A-2", now)];

        let stmt = insert_records(&records, |r| {
            Ok(EngineValues {
                id: r.id.to_string().into(),
                sales: 0_i64.into(),
                discount: 0_i64.into(),
                profit: 0_i64.into(),
                created_at: "t".into(),
                updated_at: "t".into(),
            })
        })
        .unwrap();

        let sql = stmt.to_string(SqliteQueryBuilder);
        assert!(sql.contains("'A-1'"), "{}", sql);
        assert!(sql.contains("'A-2'"), "{}", sql);
        assert!(sql.starts_with(r#"INSERT INTO "sales""#), "{}", sql);
    }
}
