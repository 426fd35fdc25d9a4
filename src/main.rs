use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use customer_retention::configuration::get_config;
use customer_retention::log_sink::FileSink;
use customer_retention::retention;
use customer_retention::startup::get_connection_pool;
use customer_retention::store::PgRetentionStore;
use customer_retention::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = get_subscriber(
        "customer-retention".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    match try_main().await {
        Ok(deleted) => {
            tracing::info!(deleted, "Retention pass finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "Retention pass failed");
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> Result<u64, anyhow::Error> {
    let config = get_config().context("Failed to read configuration")?;
    let now = config.retention.now_override.unwrap_or_else(Utc::now);

    let pool = get_connection_pool(&config.database);
    let store = PgRetentionStore::new(pool);
    let sink = FileSink::new(&config.retention.summary_log_file);

    let deleted = retention::execute(&store, &sink, config.retention.retention_days, now).await?;
    Ok(deleted)
}
