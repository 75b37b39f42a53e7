//! Single-table key schema.
//!
//! Every record shape has one builder here so key layout stays in one
//! place:
//!
//! | record                | partition key      | sort key             |
//! |-----------------------|--------------------|----------------------|
//! | club canonical        | `CLUB#<id>`        | `META`               |
//! | club name index       | `CLUB_NAME`        | `<normalized>#<id>`  |
//! | membership canonical  | `CLUB#<id>`        | `MEMBER#<user>`      |
//! | club-member index     | `CLUB#<id>#ROLE`   | `<role>#<user>`      |
//! | user membership index | `USER#<id>`        | `CLUB#<club>`        |
//! | user profile          | `USER#<id>`        | `PROFILE`            |

use domain::models::MembershipRole;
use uuid::Uuid;

use crate::store::StoreKey;

/// Shared partition holding every club's name-index entry.
pub const NAME_INDEX_PARTITION: &str = "CLUB_NAME";

/// Sort key of a club's canonical record.
pub const CLUB_META_SORT: &str = "META";

/// Sort key of a user's profile record.
pub const PROFILE_SORT: &str = "PROFILE";

pub fn club_partition(club_id: Uuid) -> String {
    format!("CLUB#{}", club_id)
}

/// Canonical club record key.
pub fn club_key(club_id: Uuid) -> StoreKey {
    StoreKey::new(club_partition(club_id), CLUB_META_SORT)
}

/// Sort key inside the name index: normalized name, then id as a
/// tie-breaker, giving a total order for stable pagination.
pub fn name_index_sort(normalized_name: &str, club_id: Uuid) -> String {
    format!("{}#{}", normalized_name, club_id)
}

/// Name-index record key for a club.
pub fn name_index_key(normalized_name: &str, club_id: Uuid) -> StoreKey {
    StoreKey::new(NAME_INDEX_PARTITION, name_index_sort(normalized_name, club_id))
}

/// Prefix matching every name-index entry with this exact normalized
/// name (the trailing `#` keeps `velo` from matching `velo club`).
pub fn name_index_prefix(normalized_name: &str) -> String {
    format!("{}#", normalized_name)
}

/// Sort key of a membership canonical record within its club.
pub fn membership_sort(user_id: Uuid) -> String {
    format!("MEMBER#{}", user_id)
}

/// Canonical membership record key, addressed by (club, user).
pub fn membership_key(club_id: Uuid, user_id: Uuid) -> StoreKey {
    StoreKey::new(club_partition(club_id), membership_sort(user_id))
}

/// Partition of a club's member index.
pub fn member_index_partition(club_id: Uuid) -> String {
    format!("CLUB#{}#ROLE", club_id)
}

/// Sort key inside the member index: role first so listings can be
/// scoped to a role prefix, then user id.
pub fn member_index_sort(role: MembershipRole, user_id: Uuid) -> String {
    format!("{}#{}", role.as_str(), user_id)
}

/// Club-member index record key.
pub fn member_index_key(club_id: Uuid, role: MembershipRole, user_id: Uuid) -> StoreKey {
    StoreKey::new(member_index_partition(club_id), member_index_sort(role, user_id))
}

/// Prefix matching every member-index entry with this role.
pub fn role_prefix(role: MembershipRole) -> String {
    format!("{}#", role.as_str())
}

pub fn user_partition(user_id: Uuid) -> String {
    format!("USER#{}", user_id)
}

/// Sort key of a user-index entry for one club.
pub fn user_membership_sort(club_id: Uuid) -> String {
    format!("CLUB#{}", club_id)
}

/// User membership-index record key.
pub fn user_membership_key(user_id: Uuid, club_id: Uuid) -> StoreKey {
    StoreKey::new(user_partition(user_id), user_membership_sort(club_id))
}

/// Prefix matching every user-index membership entry (and skipping
/// the profile record in the same partition).
pub const USER_MEMBERSHIP_PREFIX: &str = "CLUB#";

/// User profile record key.
pub fn user_profile_key(user_id: Uuid) -> StoreKey {
    StoreKey::new(user_partition(user_id), PROFILE_SORT)
}
