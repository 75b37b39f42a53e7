//! Membership record payloads.

use chrono::{DateTime, Utc};
use domain::models::{Membership, MembershipRole, MembershipStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const RECORD_TYPE_MEMBERSHIP: &str = "MEMBERSHIP";
pub const RECORD_TYPE_USER_MEMBERSHIP_INDEX: &str = "USER_MEMBERSHIP_INDEX";
pub const RECORD_TYPE_CLUB_MEMBER_INDEX: &str = "CLUB_MEMBER_INDEX";

/// Stored payload of a membership, shared by the canonical record and
/// both derived index records (full projection, written atomically).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub record_type: String,
    pub membership_id: Uuid,
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MembershipRecord {
    fn from_membership(membership: &Membership, record_type: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            membership_id: membership.membership_id,
            club_id: membership.club_id,
            user_id: membership.user_id,
            role: membership.role,
            status: membership.status,
            joined_at: membership.joined_at,
            updated_at: membership.updated_at,
            join_message: membership.join_message.clone(),
            invited_by: membership.invited_by,
            processed_by: membership.processed_by,
            processed_at: membership.processed_at,
            reason: membership.reason.clone(),
        }
    }

    /// Payload of the canonical record keyed by (club, user).
    pub fn canonical(membership: &Membership) -> Self {
        Self::from_membership(membership, RECORD_TYPE_MEMBERSHIP)
    }

    /// Payload of the user-index record ("list clubs for a user").
    pub fn user_index(membership: &Membership) -> Self {
        Self::from_membership(membership, RECORD_TYPE_USER_MEMBERSHIP_INDEX)
    }

    /// Payload of the club-member-index record ("list members of a
    /// club, by role").
    pub fn member_index(membership: &Membership) -> Self {
        Self::from_membership(membership, RECORD_TYPE_CLUB_MEMBER_INDEX)
    }
}

impl From<MembershipRecord> for Membership {
    fn from(record: MembershipRecord) -> Self {
        Self {
            membership_id: record.membership_id,
            club_id: record.club_id,
            user_id: record.user_id,
            role: record.role,
            status: record.status,
            joined_at: record.joined_at,
            updated_at: record.updated_at,
            join_message: record.join_message,
            invited_by: record.invited_by,
            processed_by: record.processed_by,
            processed_at: record.processed_at,
            reason: record.reason,
        }
    }
}
