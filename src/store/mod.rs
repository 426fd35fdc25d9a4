mod memory;
mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use memory::{FailureMode, InMemoryStore};
pub use postgres::PgRetentionStore;

use crate::domain::CustomerId;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("The customer store is unreachable.")]
    Unavailable(#[source] anyhow::Error),
    #[error("A query against the customer store failed.")]
    Query(#[source] anyhow::Error),
}

/// Contract the persistence layer must honour for a retention pass:
/// enumerate customers, scan orders for recent activity in one pass, and
/// delete a set of customers in a single batch.
#[async_trait]
pub trait RetentionStore: Send + Sync {
    /// Every customer id currently in the store. Order is unspecified.
    async fn customer_ids(&self) -> Result<Vec<CustomerId>, StoreError>;

    /// Ids of customers owning at least one order created at or after
    /// `cutoff`. The boundary is inclusive.
    async fn active_customer_ids(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<HashSet<CustomerId>, StoreError>;

    /// Deletes the given customers in one all-or-nothing batch and returns
    /// the number of rows actually removed. The count may be smaller than
    /// the request if rows were concurrently removed; that is not an error.
    async fn delete_customers(&self, ids: &[CustomerId]) -> Result<u64, StoreError>;
}
