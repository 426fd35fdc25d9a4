use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{RetentionStore, StoreError};
use crate::domain::CustomerId;

/// What the next store operations should do. Lets callers exercise the
/// failure taxonomy without a live database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    None,
    /// Every operation fails as if the store were unreachable.
    Unavailable,
    /// Every operation fails as a retriable query error.
    QueryFailure,
}

#[derive(Debug, Clone)]
struct OrderRow {
    customer_id: CustomerId,
    created_at: DateTime<Utc>,
}

struct Inner {
    customers: Vec<CustomerId>,
    orders: Vec<OrderRow>,
    failure_mode: FailureMode,
}

/// In-process stand-in for the customer store, mirroring the Postgres
/// contract: enumerate customers, scan orders once, batch delete with
/// cascade to the owned orders.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                customers: Vec::new(),
                orders: Vec::new(),
                failure_mode: FailureMode::None,
            }),
        }
    }

    pub fn insert_customer(&self, id: CustomerId) {
        self.lock().customers.push(id);
    }

    pub fn insert_order(&self, customer_id: CustomerId, created_at: DateTime<Utc>) {
        self.lock().orders.push(OrderRow {
            customer_id,
            created_at,
        });
    }

    pub fn set_failure_mode(&self, mode: FailureMode) {
        self.lock().failure_mode = mode;
    }

    pub fn customer_count(&self) -> usize {
        self.lock().customers.len()
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn contains_customer(&self, id: CustomerId) -> bool {
        self.lock().customers.contains(&id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }

    fn check_failure(inner: &Inner) -> Result<(), StoreError> {
        match inner.failure_mode {
            FailureMode::None => Ok(()),
            FailureMode::Unavailable => Err(StoreError::Unavailable(anyhow::anyhow!(
                "connection refused"
            ))),
            FailureMode::QueryFailure => {
                Err(StoreError::Query(anyhow::anyhow!("statement timed out")))
            }
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RetentionStore for InMemoryStore {
    async fn customer_ids(&self) -> Result<Vec<CustomerId>, StoreError> {
        let inner = self.lock();
        Self::check_failure(&inner)?;
        Ok(inner.customers.clone())
    }

    async fn active_customer_ids(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<HashSet<CustomerId>, StoreError> {
        let inner = self.lock();
        Self::check_failure(&inner)?;
        Ok(inner
            .orders
            .iter()
            .filter(|order| order.created_at >= cutoff)
            .map(|order| order.customer_id)
            .collect())
    }

    async fn delete_customers(&self, ids: &[CustomerId]) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        Self::check_failure(&inner)?;
        let requested: HashSet<CustomerId> = ids.iter().copied().collect();
        let before = inner.customers.len();
        inner.customers.retain(|id| !requested.contains(id));
        let deleted = (before - inner.customers.len()) as u64;
        // Cascade: orders go with their owning customer.
        inner.orders.retain(|order| !requested.contains(&order.customer_id));
        Ok(deleted)
    }
}
