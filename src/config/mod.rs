//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod loader;
mod server;
mod storage;

pub use loader::{LoaderConfig, DEFAULT_CSV_URL};
pub use server::ServerConfig;
pub use storage::{StorageConfig, StorageType};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "SALESDASH_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "SALESDASH";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "SALESDASH_LOG";

/// Environment variable for the full database URL.
pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
/// Environment variable for the database host.
pub const DB_HOST_ENV_VAR: &str = "DB_HOST";
/// Environment variable for the database port.
pub const DB_PORT_ENV_VAR: &str = "DB_PORT";
/// Environment variable for the database name.
pub const DB_NAME_ENV_VAR: &str = "DB_NAME";
/// Environment variable for the database user.
pub const DB_USER_ENV_VAR: &str = "DB_USER";
/// Environment variable for the database password.
pub const DB_PASSWORD_ENV_VAR: &str = "DB_PASSWORD";
/// Environment variable for the CSV feed URL.
pub const CSV_URL_ENV_VAR: &str = "CSV_URL";
/// Environment variable for the server port.
pub const PORT_ENV_VAR: &str = "PORT";
/// Environment variable for an extra allowed CORS origin (deployed frontend).
pub const FRONTEND_URL_ENV_VAR: &str = "FRONTEND_URL";

use serde::Deserialize;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// CSV loader configuration.
    pub loader: LoaderConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    /// 5. Plain deployment variables (`DATABASE_URL`, `DB_HOST`, `CSV_URL`, ...)
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .set_override_option("storage.url", env_string(DATABASE_URL_ENV_VAR))?
            .set_override_option("storage.host", env_string(DB_HOST_ENV_VAR))?
            .set_override_option("storage.port", env_number(DB_PORT_ENV_VAR)?)?
            .set_override_option("storage.name", env_string(DB_NAME_ENV_VAR))?
            .set_override_option("storage.user", env_string(DB_USER_ENV_VAR))?
            .set_override_option("storage.password", env_string(DB_PASSWORD_ENV_VAR))?
            .set_override_option("loader.csv_url", env_string(CSV_URL_ENV_VAR))?
            .set_override_option("server.port", env_number(PORT_ENV_VAR)?)?
            .build()?;

        let mut config: Config = config.try_deserialize()?;

        if let Some(frontend) = env_string(FRONTEND_URL_ENV_VAR) {
            if !config.server.cors_origins.contains(&frontend) {
                config.server.cors_origins.push(frontend);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        let mut config = Self::default();
        config.storage.storage_type = StorageType::Sqlite;
        config.storage.sqlite_path = ":memory:".to_string();
        config
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.loader.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "loader.batch_size must be at least 1".to_string(),
            ));
        }
        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Non-empty value of an environment variable.
fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_number(name: &str) -> Result<Option<i64>, ConfigError> {
    env_string(name)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ConfigError::Invalid(format!("{} must be a number, got '{}'", name, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 11] = [
        DATABASE_URL_ENV_VAR,
        DB_HOST_ENV_VAR,
        DB_PORT_ENV_VAR,
        DB_NAME_ENV_VAR,
        DB_USER_ENV_VAR,
        DB_PASSWORD_ENV_VAR,
        CSV_URL_ENV_VAR,
        PORT_ENV_VAR,
        FRONTEND_URL_ENV_VAR,
        CONFIG_ENV_VAR,
        "SALESDASH__LOADER__BATCH_SIZE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.storage_type, StorageType::Postgres);
        assert_eq!(config.loader.batch_size, 500);
        assert_eq!(config.loader.csv_url, DEFAULT_CSV_URL);
        assert_eq!(config.server.cors_origins.len(), 4);
    }

    #[test]
    fn test_config_for_test() {
        let config = Config::for_test();
        assert_eq!(config.storage.storage_type, StorageType::Sqlite);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    #[serial]
    fn test_load_without_sources_uses_defaults() {
        clear_env();
        let config = Config::load(None).expect("load failed");
        assert_eq!(config.storage.host, "localhost");
        assert_eq!(config.storage.port, 5432);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    #[serial]
    fn test_plain_env_vars_override() {
        clear_env();
        std::env::set_var(DB_HOST_ENV_VAR, "db.internal");
        std::env::set_var(DB_PORT_ENV_VAR, "6543");
        std::env::set_var(CSV_URL_ENV_VAR, "http://feed.local/sales.csv");
        std::env::set_var(PORT_ENV_VAR, "8081");
        std::env::set_var(FRONTEND_URL_ENV_VAR, "https://dash.example.com");

        let config = Config::load(None).expect("load failed");
        clear_env();

        assert_eq!(config.storage.host, "db.internal");
        assert_eq!(config.storage.port, 6543);
        assert_eq!(config.loader.csv_url, "http://feed.local/sales.csv");
        assert_eq!(config.server.port, 8081);
        assert!(config
            .server
            .cors_origins
            .contains(&"https://dash.example.com".to_string()));
    }

    #[test]
    #[serial]
    fn test_prefixed_env_vars_override() {
        clear_env();
        std::env::set_var("SALESDASH__LOADER__BATCH_SIZE", "50");

        let config = Config::load(None).expect("load failed");
        clear_env();

        assert_eq!(config.loader.batch_size, 50);
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        clear_env();
        std::env::set_var(DB_PORT_ENV_VAR, "not-a-port");

        let result = Config::load(None);
        clear_env();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    #[serial]
    fn test_zero_batch_size_is_rejected() {
        clear_env();
        std::env::set_var("SALESDASH__LOADER__BATCH_SIZE", "0");

        let result = Config::load(None);
        clear_env();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
