//! Membership domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_message;

/// Role within a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Member,
    Admin,
    Owner,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "member",
            MembershipRole::Admin => "admin",
            MembershipRole::Owner => "owner",
        }
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(MembershipRole::Member),
            "admin" => Ok(MembershipRole::Admin),
            "owner" => Ok(MembershipRole::Owner),
            _ => Err(format!("Invalid membership role: {}", s)),
        }
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a membership record.
///
/// `Removed` is terminal for the record, but the same (club, user)
/// pair may create a brand-new membership afterwards (re-join).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Active,
    Removed,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Removed => "removed",
        }
    }

    /// Returns true if `self -> to` is an allowed status transition:
    /// pending -> active (approval), pending -> removed (rejection),
    /// active -> removed (leave/kick).
    pub fn can_transition_to(&self, to: MembershipStatus) -> bool {
        match (self, to) {
            (MembershipStatus::Pending, MembershipStatus::Active) => true,
            (MembershipStatus::Pending, MembershipStatus::Removed) => true,
            (MembershipStatus::Active, MembershipStatus::Removed) => true,
            _ => false,
        }
    }
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MembershipStatus::Pending),
            "active" => Ok(MembershipStatus::Active),
            "removed" => Ok(MembershipStatus::Removed),
            _ => Err(format!("Invalid membership status: {}", s)),
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user's membership in a club.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Membership {
    pub membership_id: Uuid,
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Request payload for creating a membership (join request).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMembershipRequest {
    #[validate(custom(function = "validate_message"))]
    pub join_message: Option<String>,

    pub invited_by: Option<Uuid>,
}

/// Typed status change merged into a membership by the repository.
#[derive(Debug, Clone)]
pub struct MembershipStatusChange {
    pub status: MembershipStatus,
    pub processed_by: Uuid,
    pub reason: Option<String>,
}

/// Request payload for updating a club member. Exactly one of
/// `status` and `role` must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMemberRequest {
    pub status: Option<MembershipStatus>,

    pub role: Option<MembershipRole>,

    #[validate(custom(function = "validate_message"))]
    pub reason: Option<String>,
}

/// Query parameters for listing club members.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListClubMembersQuery {
    pub role: Option<MembershipRole>,
    pub status: Option<MembershipStatus>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}
