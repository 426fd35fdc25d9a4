use chrono::{DateTime, Utc};

use crate::domain::{CustomerId, RetentionPolicy};
use crate::log_sink::{LogSink, timestamped};
use crate::store::{RetentionStore, StoreError};

#[derive(thiserror::Error, Debug)]
pub enum RetentionError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Computes the deletion set for one run: every customer with no order
/// created inside the activity window `[now - retention, now]`.
///
/// Built as a set difference over two single-pass reads instead of one
/// existence query per customer, so the cost is O(customers + orders)
/// regardless of population size. The result is sorted, making it a pure
/// function of the store snapshot rather than of enumeration order.
#[tracing::instrument(skip(store), fields(retention_days = policy.retention_days()))]
pub async fn compute_inactive_customers(
    store: &impl RetentionStore,
    policy: RetentionPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<CustomerId>, StoreError> {
    let cutoff = policy.cutoff(now);
    let customers = store.customer_ids().await?;
    let active = store.active_customer_ids(cutoff).await?;

    let mut inactive: Vec<CustomerId> = customers
        .into_iter()
        .filter(|id| !active.contains(id))
        .collect();
    inactive.sort_unstable();
    // A store returning duplicate rows must not make us count a customer twice.
    inactive.dedup();
    Ok(inactive)
}

/// Deletes the given customers in one batch and returns the count actually
/// removed. An empty set never touches the store, which also makes a retried
/// run after a purge a no-op.
#[tracing::instrument(skip(store, ids), fields(requested = ids.len()))]
pub async fn purge(
    store: &impl RetentionStore,
    ids: &[CustomerId],
) -> Result<u64, StoreError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let deleted = store.delete_customers(ids).await?;
    if deleted < ids.len() as u64 {
        // Rows can vanish between the scan and the delete; tolerated.
        tracing::info!(
            requested = ids.len(),
            deleted,
            "Some requested customers were already gone"
        );
    }
    Ok(deleted)
}

/// Runs one full retention pass: validate the period, compute the deletion
/// set, purge it, and report the result to the sink.
///
/// The success or failure recorded in the sink is decided by the outcome of
/// the purge itself; a sink that cannot be written never turns a completed
/// purge into a failed run, and never masks a failed one.
pub async fn execute(
    store: &impl RetentionStore,
    sink: &dyn LogSink,
    retention_days: i64,
    now: DateTime<Utc>,
) -> Result<u64, RetentionError> {
    match run_pass(store, retention_days, now).await {
        Ok(deleted) => {
            report(sink, now, &format!("Deleted {deleted} inactive customers"));
            report(sink, now, "Retention run completed successfully");
            Ok(deleted)
        }
        Err(e) => {
            report(sink, now, &format!("Retention run FAILED: {e}"));
            Err(e)
        }
    }
}

async fn run_pass(
    store: &impl RetentionStore,
    retention_days: i64,
    now: DateTime<Utc>,
) -> Result<u64, RetentionError> {
    let policy = RetentionPolicy::new(retention_days).map_err(RetentionError::Configuration)?;
    let inactive = compute_inactive_customers(store, policy, now).await?;
    Ok(purge(store, &inactive).await?)
}

fn report(sink: &dyn LogSink, at: DateTime<Utc>, message: &str) {
    tracing::info!("{message}");
    if let Err(e) = sink.append(&timestamped(at, message)) {
        tracing::warn!(error = ?e, "Failed to write to the summary log sink");
    }
}
