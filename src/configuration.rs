use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::domain::DEFAULT_RETENTION_DAYS;

#[derive(Deserialize)]
pub struct Configuration {
    pub database: DatabaseConfigs,
    #[serde(default)]
    pub retention: RetentionConfigs,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfigs {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

#[derive(Deserialize, Clone)]
pub struct RetentionConfigs {
    /// Window length in days; customers with no order inside it are purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Fixed evaluation timestamp (RFC 3339) for backfills and tests.
    /// The wall clock is used when absent.
    #[serde(default)]
    pub now_override: Option<DateTime<Utc>>,
    /// File the run summary lines are appended to.
    #[serde(default = "default_summary_log_file")]
    pub summary_log_file: PathBuf,
}

impl Default for RetentionConfigs {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            now_override: None,
            summary_log_file: default_summary_log_file(),
        }
    }
}

fn default_retention_days() -> i64 {
    DEFAULT_RETENTION_DAYS
}

fn default_summary_log_file() -> PathBuf {
    PathBuf::from("/tmp/customer_cleanup_log.txt")
}

pub fn get_config() -> Result<Configuration, config::ConfigError> {
    // initialise config reader
    let configs = config::Config::builder()
        .add_source(config::File::new("config.yaml", config::FileFormat::Yaml))
        .build()?;

    // convert the config values to config type
    configs.try_deserialize::<Configuration>()
}

impl DatabaseConfigs {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(&self.password)
            .port(self.port)
            .database(&self.database_name)
    }
}
