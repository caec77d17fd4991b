//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building,
//! plus the DDL each backend runs at startup.

use sea_query::Iden;

/// Sales table schema.
///
/// One row per source transaction. Indexed on every column used as a
/// group-by or filter key.
#[derive(Iden, Clone, Copy)]
pub enum Sales {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "no"]
    No,
    #[iden = "row_id"]
    RowId,
    #[iden = "order_id"]
    OrderId,
    #[iden = "order_date"]
    OrderDate,
    #[iden = "ship_date"]
    ShipDate,
    #[iden = "ship_mode"]
    ShipMode,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "customer_name"]
    CustomerName,
    #[iden = "segment"]
    Segment,
    #[iden = "country"]
    Country,
    #[iden = "city"]
    City,
    #[iden = "state"]
    State,
    #[iden = "postal_code"]
    PostalCode,
    #[iden = "region"]
    Region,
    #[iden = "product_id"]
    ProductId,
    #[iden = "category"]
    Category,
    #[iden = "sub_category"]
    SubCategory,
    #[iden = "product_name"]
    ProductName,
    /// Sale amount. NUMERIC(10,2) in PostgreSQL, hundredths in SQLite.
    #[iden = "sales"]
    Sales,
    #[iden = "quantity"]
    Quantity,
    /// Discount rate. NUMERIC(5,4) in PostgreSQL, ten-thousandths in SQLite.
    #[iden = "discount"]
    Discount,
    /// Profit amount. NUMERIC(10,2) in PostgreSQL, hundredths in SQLite.
    #[iden = "profit"]
    Profit,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

/// Every column of the sales table, in insert/select order.
pub const SALES_COLUMNS: [Sales; 25] = [
    Sales::Id,
    Sales::No,
    Sales::RowId,
    Sales::OrderId,
    Sales::OrderDate,
    Sales::ShipDate,
    Sales::ShipMode,
    Sales::CustomerId,
    Sales::CustomerName,
    Sales::Segment,
    Sales::Country,
    Sales::City,
    Sales::State,
    Sales::PostalCode,
    Sales::Region,
    Sales::ProductId,
    Sales::Category,
    Sales::SubCategory,
    Sales::ProductName,
    Sales::Sales,
    Sales::Quantity,
    Sales::Discount,
    Sales::Profit,
    Sales::CreatedAt,
    Sales::UpdatedAt,
];

/// Indexes shared by both backends.
const SALES_INDEXES: [&str; 8] = [
    "CREATE INDEX IF NOT EXISTS idx_sales_order_id ON sales(order_id)",
    "CREATE INDEX IF NOT EXISTS idx_sales_order_date ON sales(order_date)",
    "CREATE INDEX IF NOT EXISTS idx_sales_customer_id ON sales(customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_sales_segment ON sales(segment)",
    "CREATE INDEX IF NOT EXISTS idx_sales_region ON sales(region)",
    "CREATE INDEX IF NOT EXISTS idx_sales_product_id ON sales(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_sales_category ON sales(category)",
    "CREATE INDEX IF NOT EXISTS idx_sales_created_at ON sales(created_at)",
];

/// SQL for creating the sales table in PostgreSQL.
pub const CREATE_SALES_TABLE_POSTGRES: &str = r#"
CREATE TABLE IF NOT EXISTS sales (
    id UUID PRIMARY KEY,
    "no" INTEGER,
    row_id INTEGER UNIQUE,
    order_id VARCHAR(20) NOT NULL,
    order_date DATE,
    ship_date DATE,
    ship_mode VARCHAR(50),
    customer_id VARCHAR(20),
    customer_name VARCHAR(100),
    segment VARCHAR(50),
    country VARCHAR(50),
    city VARCHAR(50),
    state VARCHAR(50),
    postal_code VARCHAR(20),
    region VARCHAR(50),
    product_id VARCHAR(50),
    category VARCHAR(50),
    sub_category VARCHAR(50),
    product_name TEXT,
    sales NUMERIC(10, 2),
    quantity INTEGER,
    discount NUMERIC(5, 4),
    profit NUMERIC(10, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// SQL for creating the sales table in SQLite.
///
/// Measures are scaled integers so `SUM` stays exact; timestamps are
/// RFC 3339 UTC text, which sorts chronologically.
pub const CREATE_SALES_TABLE_SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS sales (
    id TEXT PRIMARY KEY,
    "no" INTEGER,
    row_id INTEGER UNIQUE,
    order_id TEXT NOT NULL,
    order_date TEXT,
    ship_date TEXT,
    ship_mode TEXT,
    customer_id TEXT,
    customer_name TEXT,
    segment TEXT,
    country TEXT,
    city TEXT,
    state TEXT,
    postal_code TEXT,
    region TEXT,
    product_id TEXT,
    category TEXT,
    sub_category TEXT,
    product_name TEXT,
    sales INTEGER,
    quantity INTEGER,
    discount INTEGER,
    profit INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// Table plus index DDL, one statement per entry.
pub fn sales_ddl(create_table: &'static str) -> impl Iterator<Item = &'static str> {
    std::iter::once(create_table).chain(SALES_INDEXES)
}
