//! PostgreSQL store backend.
//!
//! Single-table layout: `records (pk, sk, item jsonb)`. Atomicity
//! comes from one transaction per write batch; existence conditions
//! map to rows-affected checks on `ON CONFLICT DO NOTHING` inserts,
//! `UPDATE`s and `DELETE`s.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::{
    QueryPage, SortCondition, StoreClient, StoreError, StoreKey, StoreRecord, WriteCondition,
    WriteOp,
};

/// PostgreSQL implementation of [`StoreClient`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// Escapes LIKE metacharacters so a sort-key prefix matches literally.
fn like_escape(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl StoreClient for PgStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<StoreRecord>, StoreError> {
        let item: Option<JsonValue> =
            sqlx::query_scalar("SELECT item FROM records WHERE pk = $1 AND sk = $2")
                .bind(&key.partition)
                .bind(&key.sort)
                .fetch_optional(&self.pool)
                .await
                .map_err(unavailable)?;

        Ok(item.map(|item| StoreRecord::new(key.clone(), item)))
    }

    async fn query(
        &self,
        partition: &str,
        condition: &SortCondition,
        limit: usize,
        exclusive_start: Option<&str>,
    ) -> Result<QueryPage, StoreError> {
        // Overscan by one row to learn whether more remain.
        let fetch = (limit + 1) as i64;

        let rows: Vec<(String, JsonValue)> = match (condition, exclusive_start) {
            (SortCondition::All, None) => {
                sqlx::query_as(
                    "SELECT sk, item FROM records WHERE pk = $1 ORDER BY sk LIMIT $2",
                )
                .bind(partition)
                .bind(fetch)
                .fetch_all(&self.pool)
                .await
            }
            (SortCondition::All, Some(start)) => {
                sqlx::query_as(
                    "SELECT sk, item FROM records WHERE pk = $1 AND sk > $2 ORDER BY sk LIMIT $3",
                )
                .bind(partition)
                .bind(start)
                .bind(fetch)
                .fetch_all(&self.pool)
                .await
            }
            (SortCondition::BeginsWith(prefix), None) => {
                sqlx::query_as(
                    "SELECT sk, item FROM records \
                     WHERE pk = $1 AND sk LIKE $2 ESCAPE '\\' ORDER BY sk LIMIT $3",
                )
                .bind(partition)
                .bind(format!("{}%", like_escape(prefix)))
                .bind(fetch)
                .fetch_all(&self.pool)
                .await
            }
            (SortCondition::BeginsWith(prefix), Some(start)) => {
                sqlx::query_as(
                    "SELECT sk, item FROM records \
                     WHERE pk = $1 AND sk LIKE $2 ESCAPE '\\' AND sk > $3 ORDER BY sk LIMIT $4",
                )
                .bind(partition)
                .bind(format!("{}%", like_escape(prefix)))
                .bind(start)
                .bind(fetch)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unavailable)?;

        let has_more = rows.len() > limit;
        let records = rows
            .into_iter()
            .take(limit)
            .map(|(sk, item)| StoreRecord::new(StoreKey::new(partition, sk), item))
            .collect();

        Ok(QueryPage { records, has_more })
    }

    async fn atomic_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        for op in ops {
            match op {
                WriteOp::Put { record, condition } => {
                    let StoreKey { partition, sort } = record.key;
                    let affected = match condition {
                        WriteCondition::None => {
                            sqlx::query(
                                "INSERT INTO records (pk, sk, item) VALUES ($1, $2, $3) \
                                 ON CONFLICT (pk, sk) DO UPDATE SET item = EXCLUDED.item",
                            )
                            .bind(&partition)
                            .bind(&sort)
                            .bind(&record.item)
                            .execute(&mut *tx)
                            .await
                            .map_err(unavailable)?
                            .rows_affected()
                        }
                        WriteCondition::MustNotExist => {
                            sqlx::query(
                                "INSERT INTO records (pk, sk, item) VALUES ($1, $2, $3) \
                                 ON CONFLICT (pk, sk) DO NOTHING",
                            )
                            .bind(&partition)
                            .bind(&sort)
                            .bind(&record.item)
                            .execute(&mut *tx)
                            .await
                            .map_err(unavailable)?
                            .rows_affected()
                        }
                        WriteCondition::MustExist => {
                            sqlx::query(
                                "UPDATE records SET item = $3 WHERE pk = $1 AND sk = $2",
                            )
                            .bind(&partition)
                            .bind(&sort)
                            .bind(&record.item)
                            .execute(&mut *tx)
                            .await
                            .map_err(unavailable)?
                            .rows_affected()
                        }
                    };

                    if condition != WriteCondition::None && affected == 0 {
                        tx.rollback().await.map_err(unavailable)?;
                        return Err(StoreError::ConditionFailed);
                    }
                }
                WriteOp::Delete { key, condition } => {
                    if condition == WriteCondition::MustNotExist {
                        // Degenerate guard: fail when the record exists.
                        let exists: Option<i32> = sqlx::query_scalar(
                            "SELECT 1 FROM records WHERE pk = $1 AND sk = $2",
                        )
                        .bind(&key.partition)
                        .bind(&key.sort)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(unavailable)?;
                        if exists.is_some() {
                            tx.rollback().await.map_err(unavailable)?;
                            return Err(StoreError::ConditionFailed);
                        }
                        continue;
                    }

                    let affected =
                        sqlx::query("DELETE FROM records WHERE pk = $1 AND sk = $2")
                            .bind(&key.partition)
                            .bind(&key.sort)
                            .execute(&mut *tx)
                            .await
                            .map_err(unavailable)?
                            .rows_affected();

                    if condition == WriteCondition::MustExist && affected == 0 {
                        tx.rollback().await.map_err(unavailable)?;
                        return Err(StoreError::ConditionFailed);
                    }
                }
            }
        }

        tx.commit().await.map_err(unavailable)
    }
}
