//! CSV loader configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Public superstore feed used when no source is configured.
pub const DEFAULT_CSV_URL: &str =
    "https://raw.githubusercontent.com/rudyluis/DashboardJS/refs/heads/main/superstore_data.csv";

/// Loader configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// CSV feed fetched by `POST /api/data/load`.
    pub csv_url: String,
    /// Rows per insert statement/transaction.
    pub batch_size: usize,
    /// Timeout for fetching the feed, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            batch_size: 500,
            fetch_timeout_secs: 60,
        }
    }
}

impl LoaderConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
