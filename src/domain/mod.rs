mod customer_id;
mod retention_policy;

pub use customer_id::CustomerId;
pub use retention_policy::{DEFAULT_RETENTION_DAYS, RetentionPolicy};
