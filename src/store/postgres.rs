use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{RetentionStore, StoreError};
use crate::domain::CustomerId;

/// Postgres-backed customer store. Orders reference customers with
/// `ON DELETE CASCADE` (see migrations), so purging a customer cannot leave
/// orphaned order rows behind.
pub struct PgRetentionStore {
    pool: PgPool,
}

impl PgRetentionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Connection-level failures mean the store is unreachable and the run must
// abort without deleting anything; everything else is a failed query.
fn classify(e: sqlx::Error, what: &'static str) -> StoreError {
    let unreachable = matches!(
        e,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
    );
    let source = anyhow::Error::new(e).context(what);
    if unreachable {
        StoreError::Unavailable(source)
    } else {
        StoreError::Query(source)
    }
}

#[async_trait]
impl RetentionStore for PgRetentionStore {
    #[tracing::instrument(skip(self))]
    async fn customer_ids(&self) -> Result<Vec<CustomerId>, StoreError> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM customers")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to enumerate customers"))?;
        Ok(ids.into_iter().map(CustomerId::new).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn active_customer_ids(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<HashSet<CustomerId>, StoreError> {
        // One pass over orders instead of an existence query per customer.
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT DISTINCT customer_id FROM orders WHERE created_at >= $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to scan orders for recent activity"))?;
        Ok(ids.into_iter().map(CustomerId::new).collect())
    }

    #[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn delete_customers(&self, ids: &[CustomerId]) -> Result<u64, StoreError> {
        let raw: Vec<Uuid> = ids.iter().map(CustomerId::as_uuid).collect();
        // A single statement keeps the purge all-or-nothing.
        let deleted = sqlx::query("DELETE FROM customers WHERE id = ANY($1)")
            .bind(&raw)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to batch delete inactive customers"))?
            .rows_affected();
        Ok(deleted)
    }
}
