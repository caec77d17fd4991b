//! Storage configuration types.

use serde::Deserialize;

/// Storage type discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Postgres,
    Sqlite,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Postgres => write!(f, "postgres"),
            StorageType::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Storage configuration.
///
/// PostgreSQL connects to `url` when it is set, otherwise to a URL composed
/// from the individual connection components.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type discriminator.
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// Full PostgreSQL connection URL; overrides the components below.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Database name.
    pub name: String,
    pub user: String,
    pub password: String,
    /// Database file for the SQLite backend.
    pub sqlite_path: String,
    /// Connection pool size.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Postgres,
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "sales_dashboard".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            sqlite_path: "./data/sales.db".to_string(),
            max_connections: 5,
        }
    }
}

impl StorageConfig {
    /// PostgreSQL connection URL.
    pub fn postgres_url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ if self.password.is_empty() => format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.name
            ),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}
