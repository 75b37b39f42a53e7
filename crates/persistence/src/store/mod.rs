//! Transactional key-value store client.
//!
//! A thin contract over the underlying single-table store: point
//! reads, ordered partition queries, and atomic multi-record writes
//! where each operation may be conditioned on the record existing or
//! not existing. A violated condition fails the whole batch and is
//! reported as a conflict, distinguishable from availability
//! failures so callers can map it to domain-level errors.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write did not hold; nothing was written.
    #[error("Conditional write failed")]
    ConditionFailed,

    /// The store could not be reached or failed internally.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored payload did not decode into the expected shape.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// True for the conflict kind (condition violation); callers map
    /// these to domain duplicate/not-found errors instead of
    /// internal failures.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::ConditionFailed)
    }
}

/// Full key of a record: partition key plus sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub partition: String,
    pub sort: String,
}

impl StoreKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

/// A keyed record with its JSON payload.
#[derive(Debug, Clone)]
pub struct StoreRecord {
    pub key: StoreKey,
    pub item: JsonValue,
}

impl StoreRecord {
    pub fn new(key: StoreKey, item: JsonValue) -> Self {
        Self { key, item }
    }
}

/// Existence condition attached to a write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCondition {
    /// Unconditional.
    None,
    /// The record must not exist yet.
    MustNotExist,
    /// The record must already exist.
    MustExist,
}

/// One operation inside an atomic write batch.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put {
        record: StoreRecord,
        condition: WriteCondition,
    },
    Delete {
        key: StoreKey,
        condition: WriteCondition,
    },
}

impl WriteOp {
    pub fn put(record: StoreRecord) -> Self {
        Self::Put {
            record,
            condition: WriteCondition::None,
        }
    }

    pub fn put_if_absent(record: StoreRecord) -> Self {
        Self::Put {
            record,
            condition: WriteCondition::MustNotExist,
        }
    }

    pub fn put_if_exists(record: StoreRecord) -> Self {
        Self::Put {
            record,
            condition: WriteCondition::MustExist,
        }
    }

    pub fn delete(key: StoreKey) -> Self {
        Self::Delete {
            key,
            condition: WriteCondition::None,
        }
    }
}

/// Sort-key condition applied to a partition query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCondition {
    /// Every record in the partition.
    All,
    /// Records whose sort key starts with the given prefix.
    BeginsWith(String),
}

impl SortCondition {
    fn matches(&self, sort_key: &str) -> bool {
        match self {
            SortCondition::All => true,
            SortCondition::BeginsWith(prefix) => sort_key.starts_with(prefix.as_str()),
        }
    }
}

/// One page of a partition query.
#[derive(Debug, Clone)]
pub struct QueryPage {
    /// Matching records in sort-key ascending order.
    pub records: Vec<StoreRecord>,
    /// Whether more matching records exist beyond this page.
    pub has_more: bool,
}

/// Contract implemented by store backends.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Point read; absent records are `Ok(None)`, not an error.
    async fn get(&self, key: &StoreKey) -> Result<Option<StoreRecord>, StoreError>;

    /// Ordered scan of one partition. `exclusive_start` is a sort key
    /// strictly before the first returned record (cursor resume).
    async fn query(
        &self,
        partition: &str,
        condition: &SortCondition,
        limit: usize,
        exclusive_start: Option<&str>,
    ) -> Result<QueryPage, StoreError>;

    /// Applies every operation or none. Any violated condition aborts
    /// the batch with [`StoreError::ConditionFailed`].
    async fn atomic_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;
}
