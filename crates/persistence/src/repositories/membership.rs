//! Membership repository.
//!
//! Every membership is three records written atomically: the
//! canonical record keyed by (club, user), a user-index entry for
//! "list clubs for a user", and a club-member-index entry whose sort
//! key embeds the role for role-scoped member listings. Updates
//! re-read the canonical record, merge the typed change, and rewrite
//! all three; a role change moves the member-index entry in the same
//! batch.
//!
//! There is no update path keyed by membership id alone: no index
//! backs it, so all mutation goes through (club id, user id).

use chrono::Utc;
use domain::models::{
    ClubMember, CreateMembershipRequest, ListClubMembersQuery, MemberPage, Membership,
    MembershipRole, MembershipStatus, MembershipStatusChange, ProfileLookupError, UserDirectory,
};
use domain::{DomainError, DomainResult};
use shared::cursor::{decode_cursor, encode_cursor, MemberCursor};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{decode_item, encode_item, store_internal, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::entities::MembershipRecord;
use crate::keys;
use crate::metrics::StoreTimer;
use crate::store::{SortCondition, StoreClient, StoreRecord, WriteOp};

/// Repository for membership records.
#[derive(Clone)]
pub struct MembershipRepository {
    store: Arc<dyn StoreClient>,
}

impl MembershipRepository {
    /// Create a new repository instance.
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self { store }
    }

    /// Creates a membership, writing all three records atomically.
    /// The canonical key is conditioned on absence, which together
    /// with the service-level existence check prevents duplicate
    /// live memberships for a (club, user) pair.
    pub async fn create(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        request: &CreateMembershipRequest,
        role: MembershipRole,
        initial_status: MembershipStatus,
    ) -> DomainResult<Membership> {
        let now = Utc::now();
        let membership = Membership {
            membership_id: Uuid::new_v4(),
            club_id,
            user_id,
            role,
            status: initial_status,
            joined_at: now,
            updated_at: now,
            join_message: request.join_message.clone(),
            invited_by: request.invited_by,
            processed_by: None,
            processed_at: None,
            reason: None,
        };

        let ops = vec![
            WriteOp::put_if_absent(StoreRecord::new(
                keys::membership_key(club_id, user_id),
                encode_item(&MembershipRecord::canonical(&membership))?,
            )),
            WriteOp::put(StoreRecord::new(
                keys::user_membership_key(user_id, club_id),
                encode_item(&MembershipRecord::user_index(&membership))?,
            )),
            WriteOp::put(StoreRecord::new(
                keys::member_index_key(club_id, role, user_id),
                encode_item(&MembershipRecord::member_index(&membership))?,
            )),
        ];

        let timer = StoreTimer::new("membership_create");
        let written = self.store.atomic_write(ops).await;
        timer.record();

        match written {
            Ok(()) => {
                info!(
                    club_id = %club_id,
                    user_id = %user_id,
                    role = %role,
                    status = %initial_status,
                    "Membership created"
                );
                Ok(membership)
            }
            Err(err) if err.is_conflict() => Err(DomainError::conflict(
                "User already has a membership in this club",
            )),
            Err(err) => Err(store_internal(err)),
        }
    }

    /// Replaces a removed membership with a brand-new one (re-join
    /// after leaving). The canonical key is already occupied by the
    /// removed record, so this is a conditioned rewrite of all three
    /// records rather than a conditioned insert.
    pub async fn recreate(
        &self,
        previous: &Membership,
        request: &CreateMembershipRequest,
        role: MembershipRole,
        initial_status: MembershipStatus,
    ) -> DomainResult<Membership> {
        if previous.status != MembershipStatus::Removed {
            return Err(DomainError::conflict(
                "User already has a membership in this club",
            ));
        }

        let now = Utc::now();
        let membership = Membership {
            membership_id: Uuid::new_v4(),
            club_id: previous.club_id,
            user_id: previous.user_id,
            role,
            status: initial_status,
            joined_at: now,
            updated_at: now,
            join_message: request.join_message.clone(),
            invited_by: request.invited_by,
            processed_by: None,
            processed_at: None,
            reason: None,
        };

        self.rewrite(&membership, previous.role).await?;
        info!(
            club_id = %membership.club_id,
            user_id = %membership.user_id,
            "Membership recreated after removal"
        );
        Ok(membership)
    }

    /// Point read by the canonical (club, user) key.
    pub async fn get_by_club_and_user(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Option<Membership>> {
        let timer = StoreTimer::new("membership_get");
        let record = self.store.get(&keys::membership_key(club_id, user_id)).await;
        timer.record();

        match record.map_err(store_internal)? {
            Some(record) => {
                let decoded: MembershipRecord = decode_item(record.item)?;
                Ok(Some(decoded.into()))
            }
            None => Ok(None),
        }
    }

    /// Lists members of a club from the member index. A role filter
    /// narrows the scan to the role's sort-key prefix; a status
    /// filter is applied after the scan. Rows are enriched with user
    /// profiles; a failed lookup is carried per-row and never fails
    /// the listing.
    pub async fn list_club_members(
        &self,
        club_id: Uuid,
        query: &ListClubMembersQuery,
        directory: Arc<dyn UserDirectory>,
    ) -> DomainResult<MemberPage> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let start = match &query.cursor {
            Some(raw) => {
                let cursor: MemberCursor = decode_cursor(raw)?;
                Some(cursor.member)
            }
            None => None,
        };

        let condition = match query.role {
            Some(role) => SortCondition::BeginsWith(keys::role_prefix(role)),
            None => SortCondition::All,
        };

        let timer = StoreTimer::new("membership_list_club_members");
        let page = self
            .store
            .query(
                &keys::member_index_partition(club_id),
                &condition,
                limit + 1,
                start.as_deref(),
            )
            .await;
        timer.record();

        let scanned: Vec<MembershipRecord> = page
            .map_err(store_internal)?
            .records
            .into_iter()
            .map(|record| decode_item(record.item))
            .collect::<DomainResult<_>>()?;
        let overscanned = scanned.len() > limit;

        let mut matching: Vec<MembershipRecord> = scanned
            .iter()
            .filter(|record| query.status.map_or(true, |status| record.status == status))
            .cloned()
            .collect();

        let next_cursor = if matching.len() > limit {
            matching.truncate(limit);
            matching.last().map(|record| member_cursor(club_id, record))
        } else if overscanned {
            scanned.last().map(|record| member_cursor(club_id, record))
        } else {
            None
        };

        let memberships: Vec<Membership> = matching.into_iter().map(Membership::from).collect();
        let members = hydrate_profiles(memberships, directory).await;

        Ok(MemberPage {
            members,
            next_cursor,
        })
    }

    /// Lists a user's memberships across clubs from the user index,
    /// optionally filtered by status. Follows pages until exhausted.
    pub async fn list_user_memberships(
        &self,
        user_id: Uuid,
        status: Option<MembershipStatus>,
    ) -> DomainResult<Vec<Membership>> {
        let partition = keys::user_partition(user_id);
        let condition = SortCondition::BeginsWith(keys::USER_MEMBERSHIP_PREFIX.to_string());

        let timer = StoreTimer::new("membership_list_user");
        let mut memberships = Vec::new();
        let mut start: Option<String> = None;
        loop {
            let page = self
                .store
                .query(&partition, &condition, MAX_PAGE_SIZE, start.as_deref())
                .await
                .map_err(store_internal)?;

            let last_sort = page.records.last().map(|record| record.key.sort.clone());
            for record in page.records {
                let decoded: MembershipRecord = decode_item(record.item)?;
                if status.map_or(true, |status| decoded.status == status) {
                    memberships.push(decoded.into());
                }
            }

            if !page.has_more || last_sort.is_none() {
                break;
            }
            start = last_sort;
        }
        timer.record();

        Ok(memberships)
    }

    /// Applies a status change: re-reads the canonical record,
    /// validates the transition, merges the processing fields, and
    /// rewrites all three records atomically.
    pub async fn update_status(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        change: MembershipStatusChange,
    ) -> DomainResult<Membership> {
        let mut membership = self
            .get_by_club_and_user(club_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Membership not found"))?;

        if !membership.status.can_transition_to(change.status) {
            return Err(DomainError::validation(format!(
                "Invalid status transition {} -> {}",
                membership.status, change.status
            )));
        }

        let now = Utc::now();
        membership.status = change.status;
        membership.processed_by = Some(change.processed_by);
        membership.processed_at = Some(now);
        membership.reason = change.reason;
        membership.updated_at = now;

        let previous_role = membership.role;
        self.rewrite(&membership, previous_role).await?;

        info!(
            club_id = %club_id,
            user_id = %user_id,
            status = %membership.status,
            "Membership status updated"
        );
        Ok(membership)
    }

    /// Changes a member's role, moving the club-member-index entry to
    /// the new role's sort key in the same atomic batch.
    pub async fn update_role(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
        processed_by: Uuid,
    ) -> DomainResult<Membership> {
        let mut membership = self
            .get_by_club_and_user(club_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Membership not found"))?;

        let previous_role = membership.role;
        let now = Utc::now();
        membership.role = role;
        membership.processed_by = Some(processed_by);
        membership.processed_at = Some(now);
        membership.updated_at = now;

        self.rewrite(&membership, previous_role).await?;

        info!(
            club_id = %club_id,
            user_id = %user_id,
            role = %role,
            "Membership role updated"
        );
        Ok(membership)
    }

    /// Rewrites all three records for a merged membership. The
    /// canonical put is conditioned on existence; a conflict means
    /// the membership vanished between read and write.
    async fn rewrite(
        &self,
        membership: &Membership,
        previous_role: MembershipRole,
    ) -> DomainResult<()> {
        let club_id = membership.club_id;
        let user_id = membership.user_id;

        let mut ops = vec![
            WriteOp::put_if_exists(StoreRecord::new(
                keys::membership_key(club_id, user_id),
                encode_item(&MembershipRecord::canonical(membership))?,
            )),
            WriteOp::put(StoreRecord::new(
                keys::user_membership_key(user_id, club_id),
                encode_item(&MembershipRecord::user_index(membership))?,
            )),
        ];
        if previous_role != membership.role {
            ops.push(WriteOp::delete(keys::member_index_key(
                club_id,
                previous_role,
                user_id,
            )));
        }
        ops.push(WriteOp::put(StoreRecord::new(
            keys::member_index_key(club_id, membership.role, user_id),
            encode_item(&MembershipRecord::member_index(membership))?,
        )));

        let timer = StoreTimer::new("membership_rewrite");
        let written = self.store.atomic_write(ops).await;
        timer.record();

        match written {
            Ok(()) => Ok(()),
            Err(err) if err.is_conflict() => {
                Err(DomainError::not_found("Membership not found"))
            }
            Err(err) => Err(store_internal(err)),
        }
    }
}

fn member_cursor(club_id: Uuid, record: &MembershipRecord) -> String {
    encode_cursor(&MemberCursor {
        member: keys::member_index_sort(record.role, record.user_id),
        id: club_id.to_string(),
    })
}

/// Fans out one profile lookup per row and joins them in order. A
/// lookup failure becomes a per-row error; the listing proceeds.
async fn hydrate_profiles(
    memberships: Vec<Membership>,
    directory: Arc<dyn UserDirectory>,
) -> Vec<ClubMember> {
    let handles: Vec<_> = memberships
        .iter()
        .map(|membership| {
            let directory = directory.clone();
            let user_id = membership.user_id;
            tokio::spawn(async move { directory.get_user_by_id(user_id).await })
        })
        .collect();

    let mut members = Vec::with_capacity(memberships.len());
    for (membership, handle) in memberships.into_iter().zip(handles) {
        let profile = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(ProfileLookupError::Unavailable(join_err.to_string())),
        };
        if let Err(err) = &profile {
            warn!(
                user_id = %membership.user_id,
                error = %err,
                "Profile hydration failed; returning placeholder fields"
            );
        }
        members.push(ClubMember {
            membership,
            profile,
        });
    }
    members
}
