//! Sales record storage interface.

use async_trait::async_trait;

use crate::analytics::{
    CategoryTotals, CustomerTotals, ProductTotals, RegionTotals, SalesSummary, StoreInfo,
};
use crate::model::SalesRecord;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the data itself (constraint or value out of range).
    ///
    /// Retrying the same rows individually isolates the offending ones.
    #[error("Rejected by database: {0}")]
    Rejected(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if is_data_rejection(db.as_ref()) => {
                StoreError::Rejected(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Decode(err.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Integrity violations and SQLSTATE class 22 (data exception: value too
/// long, numeric overflow) are caused by the rows, not by the connection.
fn is_data_rejection(db: &dyn sqlx::error::DatabaseError) -> bool {
    use sqlx::error::ErrorKind;

    match db.kind() {
        ErrorKind::UniqueViolation
        | ErrorKind::ForeignKeyViolation
        | ErrorKind::NotNullViolation
        | ErrorKind::CheckViolation => true,
        _ => db.code().is_some_and(|code| code.starts_with("22")),
    }
}

/// Interface for the sales record store.
///
/// Implementations:
/// - `PostgresSalesStore`: PostgreSQL storage (NUMERIC measures)
/// - `SqliteSalesStore`: SQLite storage (scaled-integer measures)
///
/// Every aggregate is computed by the database in exact arithmetic.
#[async_trait]
pub trait SalesStore: Send + Sync + 'static {
    /// Engine name reported to clients, e.g. "PostgreSQL".
    fn engine(&self) -> &'static str;

    /// Create the sales table and its indexes if they don't exist.
    async fn init_schema(&self) -> Result<()>;

    /// Remove every row in a single transaction.
    ///
    /// On failure the transaction is rolled back and the table is untouched.
    async fn clear(&self) -> Result<()>;

    /// Insert records as one multi-row statement committed in its own
    /// transaction. Either every record is inserted or none is.
    ///
    /// Returns the number of rows inserted.
    async fn insert_batch(&self, records: &[SalesRecord]) -> Result<u64>;

    /// Refresh planner statistics for the sales table.
    async fn analyze(&self) -> Result<()>;

    /// Number of rows in the sales table.
    async fn count(&self) -> Result<i64>;

    /// Every stored record, ordered by `no` then `row_id`.
    async fn all_records(&self) -> Result<Vec<SalesRecord>>;

    /// Totals across the whole table; zero when the table is empty.
    async fn summary(&self) -> Result<SalesSummary>;

    /// Per-category totals, highest sales first.
    async fn by_category(&self) -> Result<Vec<CategoryTotals>>;

    /// Per-region totals, highest sales first.
    async fn by_region(&self) -> Result<Vec<RegionTotals>>;

    /// Customers by total spend, highest first, at most `limit` entries.
    async fn top_customers(&self, limit: u64) -> Result<Vec<CustomerTotals>>;

    /// Products by total sales, highest first, at most `limit` entries.
    async fn top_products(&self, limit: u64) -> Result<Vec<ProductTotals>>;

    /// Engine version, row count, table size and recent activity.
    async fn info(&self) -> Result<StoreInfo>;
}
