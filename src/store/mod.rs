//! Customer record storage. One async trait, two backends: PostgreSQL and in-process memory.

mod memory;
mod postgres;

pub use memory::MemoryCustomerStore;
pub use postgres::{ensure_database_exists, PgCustomerStore, CUSTOMERS_TABLE};

use crate::model::{Customer, CustomerId, CustomerPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique constraint on member number violated.
    #[error("duplicate key: member number already exists")]
    DuplicateKey,
    /// A record with the generated id already exists.
    #[error("id conflict: {0}")]
    IdConflict(String),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Every method is one atomic operation against the store. Uniqueness of `member_number` is
/// enforced here, not by callers.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All records ordered by ascending member number.
    async fn list(&self) -> Result<Vec<Customer>, StoreError>;

    /// Insert a fully built record. Fails with `DuplicateKey` if the member number is taken.
    async fn insert(&self, customer: Customer) -> Result<Customer, StoreError>;

    async fn find(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Apply a patch and refresh `updated_at`. `Ok(None)` when the id does not resolve.
    async fn update(
        &self,
        id: &CustomerId,
        patch: &CustomerPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Customer>, StoreError>;

    /// Remove and return the record. `Ok(None)` when the id does not resolve.
    async fn delete(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Reachability check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}
