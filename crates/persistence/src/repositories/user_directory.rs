//! Store-backed user profile directory.
//!
//! Profile records share the table (single-table design) and are
//! maintained by an external user service; this directory only reads
//! them for member-list enrichment.

use async_trait::async_trait;
use domain::models::{ProfileLookupError, UserDirectory, UserProfile};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::UserProfileRecord;
use crate::keys;
use crate::store::StoreClient;

/// [`UserDirectory`] reading `USER#<id>` / `PROFILE` records.
#[derive(Clone)]
pub struct StoreUserDirectory {
    store: Arc<dyn StoreClient>,
}

impl StoreUserDirectory {
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserDirectory for StoreUserDirectory {
    async fn get_user_by_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfile>, ProfileLookupError> {
        match self.store.get(&keys::user_profile_key(user_id)).await {
            Ok(Some(record)) => {
                let decoded: UserProfileRecord = serde_json::from_value(record.item)
                    .map_err(|_| ProfileLookupError::Corrupt)?;
                Ok(Some(decoded.into()))
            }
            Ok(None) => Ok(None),
            Err(err) => Err(ProfileLookupError::Unavailable(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreRecord, WriteOp};

    #[tokio::test]
    async fn test_reads_profile_record() {
        let store = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();
        let record = UserProfileRecord::new(user_id, "Ada", "ada@example.com", None);
        store
            .atomic_write(vec![WriteOp::put(StoreRecord::new(
                keys::user_profile_key(user_id),
                serde_json::to_value(&record).unwrap(),
            ))])
            .await
            .unwrap();

        let directory = StoreUserDirectory::new(store);
        let profile = directory.get_user_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(profile.display_name, "Ada");
        assert_eq!(profile.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let directory = StoreUserDirectory::new(Arc::new(MemoryStore::new()));
        let profile = directory.get_user_by_id(Uuid::new_v4()).await.unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();
        store
            .atomic_write(vec![WriteOp::put(StoreRecord::new(
                keys::user_profile_key(user_id),
                serde_json::json!({ "unexpected": true }),
            ))])
            .await
            .unwrap();

        let directory = StoreUserDirectory::new(store);
        let err = directory.get_user_by_id(user_id).await.unwrap_err();
        assert_eq!(err, ProfileLookupError::Corrupt);
    }
}
