//! Bulk CSV loader.
//!
//! Replaces the contents of the sales table from a remote CSV feed:
//! fetch, parse, clear, decode and insert in batches, then refresh planner
//! statistics. Rows that fail to decode, or that the store rejects, are
//! skipped and counted; they never abort the load.

pub mod row;

use std::sync::Arc;

use chrono::Utc;
use csv::{ReaderBuilder, StringRecord, Trim};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::interfaces::{SalesStore, StoreError};
use crate::model::SalesRecord;

pub use row::{decode_row, Column, ColumnIndex, RowError, SOURCE_COLUMNS};

/// Errors that abort a load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The feed could not be retrieved or answered with a non-2xx status.
    #[error("Failed to fetch CSV: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The feed is empty or not a well-formed CSV table.
    #[error("Failed to parse CSV: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows now in the table.
    pub records_inserted: u64,
    /// Source rows that failed to decode or were rejected by the store.
    pub rows_skipped: u64,
    /// False when clearing the previous contents failed and was tolerated.
    pub table_cleared: bool,
}

/// Loads the sales table from a CSV feed.
///
/// Only one load runs at a time; concurrent callers wait their turn.
pub struct Loader {
    store: Arc<dyn SalesStore>,
    client: Client,
    config: LoaderConfig,
    reload: Mutex<()>,
}

impl Loader {
    /// Create a loader writing to `store`.
    pub fn new(store: Arc<dyn SalesStore>, config: LoaderConfig) -> Result<Self, LoadError> {
        let client = Client::builder().timeout(config.fetch_timeout()).build()?;

        Ok(Self {
            store,
            client,
            config,
            reload: Mutex::new(()),
        })
    }

    /// Load from the configured feed.
    pub async fn load_default(&self) -> Result<LoadReport, LoadError> {
        self.load(&self.config.csv_url).await
    }

    /// Replace the table's contents with the rows of the CSV at `url`.
    ///
    /// A fetch or parse failure leaves the table untouched.
    pub async fn load(&self, url: &str) -> Result<LoadReport, LoadError> {
        let _guard = self.reload.lock().await;

        info!(url = %url, "downloading CSV");
        let body = self.fetch(url).await?;

        let table = SourceTable::parse(&body)?;
        info!(rows = table.rows.len(), "CSV parsed");

        let mut report = LoadReport {
            table_cleared: self.clear().await,
            ..Default::default()
        };

        let at = Utc::now();
        let batch_size = self.config.batch_size.max(1);
        let mut batch: Vec<SalesRecord> = Vec::with_capacity(batch_size);

        for (index, source_row) in table.rows.iter().enumerate() {
            match decode_row(&table.columns, source_row, at) {
                Ok(record) => batch.push(record),
                Err(e) => {
                    warn!(row = index, error = %e, "skipping row");
                    report.rows_skipped += 1;
                    continue;
                }
            }

            if batch.len() >= batch_size {
                self.flush(&batch, &mut report).await?;
                info!(inserted = report.records_inserted, "batch committed");
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.flush(&batch, &mut report).await?;
            info!(count = batch.len(), "final batch committed");
        }

        if let Err(e) = self.store.analyze().await {
            warn!(error = %e, "failed to refresh table statistics");
        }

        info!(
            inserted = report.records_inserted,
            skipped = report.rows_skipped,
            "load complete"
        );
        Ok(report)
    }

    async fn fetch(&self, url: &str) -> Result<String, LoadError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Clear the table; a failure is logged and tolerated.
    async fn clear(&self) -> bool {
        match self.store.clear().await {
            Ok(()) => {
                info!("existing rows removed");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to clear sales table, continuing");
                false
            }
        }
    }

    /// Insert one batch. If the store rejects it, retry row by row so only
    /// the offending rows are skipped.
    async fn flush(&self, batch: &[SalesRecord], report: &mut LoadReport) -> Result<(), LoadError> {
        match self.store.insert_batch(batch).await {
            Ok(inserted) => {
                report.records_inserted += inserted;
                Ok(())
            }
            Err(StoreError::Rejected(reason)) => {
                warn!(size = batch.len(), reason = %reason, "batch rejected, inserting rows individually");
                for record in batch {
                    match self.store.insert_batch(std::slice::from_ref(record)).await {
                        Ok(inserted) => report.records_inserted += inserted,
                        Err(StoreError::Rejected(reason)) => {
                            warn!(order_id = %record.order_id, row_id = ?record.row_id, reason = %reason, "skipping rejected row");
                            report.rows_skipped += 1;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Parsed CSV body: header positions plus the raw data rows.
struct SourceTable {
    columns: ColumnIndex,
    rows: Vec<StringRecord>,
}

impl SourceTable {
    /// Read the whole body. Every record must have as many fields as the
    /// header. A header without data rows is a valid, empty table.
    fn parse(body: &str) -> Result<Self, LoadError> {
        if body.trim().is_empty() {
            return Err(LoadError::Parse("CSV response is empty".to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| LoadError::Parse(e.to_string()))?
            .clone();

        let columns = ColumnIndex::from_headers(&headers);
        let missing = columns.missing();
        if !missing.is_empty() {
            warn!(missing = ?missing, "CSV header lacks expected columns, rows will be skipped");
        }

        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LoadError::Parse(e.to_string()))?;

        debug!(columns = headers.len(), rows = rows.len(), "CSV table read");
        Ok(Self { columns, rows })
    }
}
