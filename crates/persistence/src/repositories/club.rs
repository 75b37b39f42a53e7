//! Club repository.
//!
//! Maintains one canonical record and one name-index record per club.
//! Both are written in a single atomic batch so readers never observe
//! a club without its index entry or a stale index entry after a
//! rename.

use chrono::Utc;
use domain::models::{
    normalize_club_name, Club, ClubPage, ClubPatch, ClubStatus, CreateClubRequest, ListClubsQuery,
};
use domain::{DomainError, DomainResult};
use shared::cursor::{decode_cursor, encode_cursor, NameCursor};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{decode_item, encode_item, store_internal, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::entities::ClubRecord;
use crate::keys;
use crate::metrics::StoreTimer;
use crate::store::{SortCondition, StoreClient, StoreRecord, WriteOp};

/// Repository for club records.
#[derive(Clone)]
pub struct ClubRepository {
    store: Arc<dyn StoreClient>,
}

impl ClubRepository {
    /// Create a new repository instance.
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self { store }
    }

    /// Point read of the canonical record. Absent clubs are `None`,
    /// not an error.
    pub async fn get_by_id(&self, club_id: Uuid) -> DomainResult<Option<Club>> {
        let timer = StoreTimer::new("club_get_by_id");
        let record = self.store.get(&keys::club_key(club_id)).await;
        timer.record();

        match record.map_err(store_internal)? {
            Some(record) => {
                let decoded: ClubRecord = decode_item(record.item)?;
                Ok(Some(decoded.into()))
            }
            None => Ok(None),
        }
    }

    /// Creates a club from a validated request. The caller is
    /// responsible for checking name uniqueness beforehand
    /// (check-then-act; the window is documented, not eliminated).
    pub async fn create(&self, request: &CreateClubRequest) -> DomainResult<Club> {
        let now = Utc::now();
        let club = Club {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            description: request.description.clone(),
            city: request.city.clone(),
            logo_url: request.logo_url.clone(),
            status: ClubStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.insert(club).await
    }

    /// Writes the canonical record (conditioned on absence) and the
    /// name-index record atomically. A conflict on the canonical key
    /// means a duplicate invocation already created the club; the
    /// existing record is returned.
    async fn insert(&self, club: Club) -> DomainResult<Club> {
        let normalized = normalize_club_name(&club.name);
        let ops = vec![
            WriteOp::put_if_absent(StoreRecord::new(
                keys::club_key(club.id),
                encode_item(&ClubRecord::canonical(&club))?,
            )),
            WriteOp::put(StoreRecord::new(
                keys::name_index_key(&normalized, club.id),
                encode_item(&ClubRecord::name_index(&club))?,
            )),
        ];

        let timer = StoreTimer::new("club_create");
        let written = self.store.atomic_write(ops).await;
        timer.record();

        match written {
            Ok(()) => {
                info!(club_id = %club.id, name = %club.name, "Club created");
                Ok(club)
            }
            Err(err) if err.is_conflict() => match self.get_by_id(club.id).await? {
                Some(existing) => Ok(existing),
                None => Err(DomainError::conflict("Club already exists")),
            },
            Err(err) => Err(store_internal(err)),
        }
    }

    /// True when no other club uses this name (case- and
    /// whitespace-insensitive). `exclude_id` skips the club's own
    /// index entry during renames.
    pub async fn is_name_unique(
        &self,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> DomainResult<bool> {
        let normalized = normalize_club_name(name);
        let prefix = keys::name_index_prefix(&normalized);

        let timer = StoreTimer::new("club_is_name_unique");
        let page = self
            .store
            .query(
                keys::NAME_INDEX_PARTITION,
                &SortCondition::BeginsWith(prefix),
                MAX_PAGE_SIZE,
                None,
            )
            .await;
        timer.record();

        for record in page.map_err(store_internal)?.records {
            let entry: ClubRecord = decode_item(record.item)?;
            // Exact-name check: the prefix scan can overmatch when a
            // name itself contains the separator.
            if entry.normalized_name == normalized && Some(entry.id) != exclude_id {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reads the canonical record, merges the typed patch, and
    /// rewrites the canonical plus name-index records atomically.
    /// Renames delete the old index entry and insert the new one in
    /// the same batch; otherwise the entry is replaced in place.
    pub async fn update(&self, club_id: Uuid, patch: ClubPatch) -> DomainResult<Club> {
        let mut club = self
            .get_by_id(club_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Club {} not found", club_id)))?;

        let previous_normalized = normalize_club_name(&club.name);

        if let Some(status) = patch.status {
            if !club.status.can_transition_to(status) {
                return Err(DomainError::validation(format!(
                    "Invalid status transition {} -> {}",
                    club.status, status
                )));
            }
            club.status = status;
        }
        if let Some(name) = patch.name {
            club.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            club.description = Some(description);
        }
        if let Some(city) = patch.city {
            club.city = Some(city);
        }
        if let Some(logo_url) = patch.logo_url {
            club.logo_url = Some(logo_url);
        }
        club.updated_at = Utc::now();

        let normalized = normalize_club_name(&club.name);

        let mut ops = vec![WriteOp::put_if_exists(StoreRecord::new(
            keys::club_key(club.id),
            encode_item(&ClubRecord::canonical(&club))?,
        ))];

        let index_record = StoreRecord::new(
            keys::name_index_key(&normalized, club.id),
            encode_item(&ClubRecord::name_index(&club))?,
        );
        if normalized == previous_normalized {
            ops.push(WriteOp::put(index_record));
        } else {
            ops.push(WriteOp::delete(keys::name_index_key(
                &previous_normalized,
                club.id,
            )));
            ops.push(WriteOp::put(index_record));
        }

        let timer = StoreTimer::new("club_update");
        let written = self.store.atomic_write(ops).await;
        timer.record();

        match written {
            Ok(()) => {
                info!(club_id = %club.id, "Club updated");
                Ok(club)
            }
            // The canonical record vanished between read and write.
            Err(err) if err.is_conflict() => {
                Err(DomainError::not_found(format!("Club {} not found", club_id)))
            }
            Err(err) => Err(store_internal(err)),
        }
    }

    /// Name-ordered listing over the name index. The status filter is
    /// applied after the index scan; the page is overscanned by one
    /// row to detect whether more records remain.
    pub async fn list(&self, query: &ListClubsQuery) -> DomainResult<ClubPage> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let start = match &query.cursor {
            Some(raw) => {
                let cursor: NameCursor = decode_cursor(raw)?;
                let id = Uuid::parse_str(&cursor.id)
                    .map_err(|_| DomainError::validation("Invalid pagination cursor"))?;
                Some(keys::name_index_sort(&cursor.name, id))
            }
            None => None,
        };

        let timer = StoreTimer::new("club_list");
        let page = self
            .store
            .query(
                keys::NAME_INDEX_PARTITION,
                &SortCondition::All,
                limit + 1,
                start.as_deref(),
            )
            .await;
        timer.record();

        let scanned: Vec<ClubRecord> = page
            .map_err(store_internal)?
            .records
            .into_iter()
            .map(|record| decode_item(record.item))
            .collect::<DomainResult<_>>()?;
        let overscanned = scanned.len() > limit;

        let mut matching: Vec<ClubRecord> = scanned
            .iter()
            .filter(|record| query.status.map_or(true, |status| record.status == status))
            .cloned()
            .collect();

        let next_cursor = if matching.len() > limit {
            matching.truncate(limit);
            matching.last().map(name_cursor)
        } else if overscanned {
            // Every scanned row was evaluated against the filter, so
            // resuming after the last scanned row skips nothing.
            scanned.last().map(name_cursor)
        } else {
            None
        };

        Ok(ClubPage {
            clubs: matching.into_iter().map(Club::from).collect(),
            next_cursor,
        })
    }
}

fn name_cursor(record: &ClubRecord) -> String {
    encode_cursor(&NameCursor {
        name: record.normalized_name.clone(),
        id: record.id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    fn repository() -> ClubRepository {
        ClubRepository::new(Arc::new(MemoryStore::new()))
    }

    fn request(name: &str) -> CreateClubRequest {
        CreateClubRequest {
            name: name.to_string(),
            description: None,
            city: None,
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = repository();
        let created = repo
            .create(&CreateClubRequest {
                name: "  Velo Club  ".to_string(),
                description: Some("Road cycling".to_string()),
                city: Some("Sydney".to_string()),
                logo_url: None,
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Velo Club");
        assert_eq!(created.status, ClubStatus::Active);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Velo Club");
        assert_eq!(fetched.city.as_deref(), Some("Sydney"));
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let repo = repository();
        assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_is_idempotent_on_retry() {
        let repo = repository();
        let club = repo.create(&request("Velo Club")).await.unwrap();

        // A duplicate invocation with the same generated id hits the
        // canonical-key condition and returns the existing record.
        let retried = repo.insert(club.clone()).await.unwrap();
        assert_eq!(retried.id, club.id);
        assert_eq!(retried.created_at, club.created_at);
    }

    #[tokio::test]
    async fn test_name_uniqueness_after_create() {
        let repo = repository();
        assert!(repo.is_name_unique("Velo Club", None).await.unwrap());

        repo.create(&request("Velo Club")).await.unwrap();

        // Case and whitespace variants collide on the normalized name.
        assert!(!repo.is_name_unique("Velo Club", None).await.unwrap());
        assert!(!repo.is_name_unique("  VELO CLUB  ", None).await.unwrap());
        // Prefix of an existing name is still unique.
        assert!(repo.is_name_unique("Velo", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_name_uniqueness_excludes_own_id() {
        let repo = repository();
        let club = repo.create(&request("Velo Club")).await.unwrap();

        assert!(repo
            .is_name_unique("Velo Club", Some(club.id))
            .await
            .unwrap());
        assert!(!repo.is_name_unique("Velo Club", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let repo = repository();
        let club = repo.create(&request("Velo Club")).await.unwrap();

        let updated = repo
            .update(
                club.id,
                ClubPatch {
                    description: Some("Crit racing".to_string()),
                    city: Some("Melbourne".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Velo Club");
        assert_eq!(updated.description.as_deref(), Some("Crit racing"));
        assert_eq!(updated.city.as_deref(), Some("Melbourne"));
        assert!(updated.updated_at >= club.updated_at);
    }

    #[tokio::test]
    async fn test_update_absent_club_is_not_found() {
        let repo = repository();
        let err = repo
            .update(Uuid::new_v4(), ClubPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rename_moves_index_entry() {
        let repo = repository();
        let club = repo.create(&request("Velo Club")).await.unwrap();

        repo.update(
            club.id,
            ClubPatch {
                name: Some("Gravel Crew".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(repo.is_name_unique("Velo Club", None).await.unwrap());
        assert!(!repo.is_name_unique("Gravel Crew", None).await.unwrap());

        // Exactly one canonical record under the club's id.
        let fetched = repo.get_by_id(club.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Gravel Crew");

        // The index holds exactly one entry for this club.
        let page = repo.list(&ListClubsQuery::default()).await.unwrap();
        assert_eq!(page.clubs.len(), 1);
        assert_eq!(page.clubs[0].id, club.id);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let repo = repository();
        let club = repo.create(&request("Velo Club")).await.unwrap();

        let suspended = repo
            .update(
                club.id,
                ClubPatch {
                    status: Some(ClubStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(suspended.status, ClubStatus::Suspended);

        let archived = repo
            .update(
                club.id,
                ClubPatch {
                    status: Some(ClubStatus::Archived),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(archived.status, ClubStatus::Archived);

        // Archived is terminal.
        let err = repo
            .update(
                club.id,
                ClubPatch {
                    status: Some(ClubStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let repo = repository();
        for name in ["Cricket", "Athletics", "Bouldering"] {
            repo.create(&request(name)).await.unwrap();
        }

        let page = repo.list(&ListClubsQuery::default()).await.unwrap();
        let names: Vec<_> = page.clubs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Athletics", "Bouldering", "Cricket"]);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_list_pagination_walk_is_exhaustive() {
        let repo = repository();
        let mut expected = HashSet::new();
        for i in 0..7 {
            let club = repo.create(&request(&format!("Club {}", i))).await.unwrap();
            expected.insert(club.id);
        }

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = repo
                .list(&ListClubsQuery {
                    status: None,
                    cursor: cursor.clone(),
                    limit: Some(3),
                })
                .await
                .unwrap();
            seen.extend(page.clubs);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        // No duplicates, no omissions, strictly increasing order.
        let ids: HashSet<_> = seen.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(seen.len(), expected.len());
        let names: Vec<_> = seen.iter().map(|c| c.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_list_status_filter() {
        let repo = repository();
        let a = repo.create(&request("Athletics")).await.unwrap();
        repo.create(&request("Bouldering")).await.unwrap();
        repo.update(
            a.id,
            ClubPatch {
                status: Some(ClubStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let active = repo
            .list(&ListClubsQuery {
                status: Some(ClubStatus::Active),
                cursor: None,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(active.clubs.len(), 1);
        assert_eq!(active.clubs[0].name, "Bouldering");
    }

    #[tokio::test]
    async fn test_list_filtered_page_still_advances() {
        let repo = repository();
        // Three suspended clubs sort before the single active one.
        for name in ["Athletics", "Bouldering", "Cricket"] {
            let club = repo.create(&request(name)).await.unwrap();
            repo.update(
                club.id,
                ClubPatch {
                    status: Some(ClubStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }
        repo.create(&request("Zumba")).await.unwrap();

        let mut found = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = repo
                .list(&ListClubsQuery {
                    status: Some(ClubStatus::Active),
                    cursor: cursor.clone(),
                    limit: Some(2),
                })
                .await
                .unwrap();
            found.extend(page.clubs);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Zumba");
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_cursor() {
        let repo = repository();
        let err = repo
            .list(&ListClubsQuery {
                status: None,
                cursor: Some("!!not-a-cursor!!".to_string()),
                limit: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
