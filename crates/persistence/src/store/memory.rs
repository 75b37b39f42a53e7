//! In-memory store backend.
//!
//! An ordered map behind a `RwLock`. Atomic writes validate every
//! condition and apply every operation under a single write guard,
//! giving the same all-or-nothing semantics as the PostgreSQL
//! backend. Used by unit and integration tests; no I/O.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::RwLock;

use super::{
    QueryPage, SortCondition, StoreClient, StoreError, StoreKey, StoreRecord, WriteCondition,
    WriteOp,
};

/// In-memory implementation of [`StoreClient`].
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<(String, String), serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored (all partitions).
    pub fn len(&self) -> usize {
        self.records.read().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<StoreRecord>, StoreError> {
        let records = self.records.read().expect("store lock poisoned");
        Ok(records
            .get(&(key.partition.clone(), key.sort.clone()))
            .map(|item| StoreRecord::new(key.clone(), item.clone())))
    }

    async fn query(
        &self,
        partition: &str,
        condition: &SortCondition,
        limit: usize,
        exclusive_start: Option<&str>,
    ) -> Result<QueryPage, StoreError> {
        let records = self.records.read().expect("store lock poisoned");

        let lower = match exclusive_start {
            Some(start) => Excluded((partition.to_string(), start.to_string())),
            None => Included((partition.to_string(), String::new())),
        };

        let mut matching = records
            .range((lower, Unbounded))
            .take_while(|((pk, _), _)| pk == partition)
            .filter(|((_, sk), _)| condition.matches(sk))
            .map(|((pk, sk), item)| {
                StoreRecord::new(StoreKey::new(pk.clone(), sk.clone()), item.clone())
            });

        let page: Vec<StoreRecord> = matching.by_ref().take(limit).collect();
        let has_more = matching.next().is_some();

        Ok(QueryPage {
            records: page,
            has_more,
        })
    }

    async fn atomic_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut records = self.records.write().expect("store lock poisoned");

        // Validate every condition before touching anything.
        for op in &ops {
            let (key, condition) = match op {
                WriteOp::Put { record, condition } => (&record.key, condition),
                WriteOp::Delete { key, condition } => (key, condition),
            };
            let exists = records.contains_key(&(key.partition.clone(), key.sort.clone()));
            let holds = match condition {
                WriteCondition::None => true,
                WriteCondition::MustNotExist => !exists,
                WriteCondition::MustExist => exists,
            };
            if !holds {
                return Err(StoreError::ConditionFailed);
            }
        }

        for op in ops {
            match op {
                WriteOp::Put { record, .. } => {
                    records.insert(
                        (record.key.partition, record.key.sort),
                        record.item,
                    );
                }
                WriteOp::Delete { key, .. } => {
                    records.remove(&(key.partition, key.sort));
                }
            }
        }

        Ok(())
    }
}
