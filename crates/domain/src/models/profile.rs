//! User profile lookup contract and profile-enriched member rows.
//!
//! Profiles are owned by an external user service; listings consume
//! them read-only and must keep working when a lookup fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::membership::Membership;

/// Public profile fields used to enrich member listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Error from a profile lookup. Never fails a listing; carried
/// per-row so callers and tests can observe partial failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileLookupError {
    #[error("Profile lookup unavailable: {0}")]
    Unavailable(String),

    #[error("Profile record is corrupt")]
    Corrupt,
}

/// Read-only lookup of user profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the profile for a user, `None` when the user is unknown.
    async fn get_user_by_id(&self, user_id: Uuid)
        -> Result<Option<UserProfile>, ProfileLookupError>;
}

/// Placeholder shown when profile hydration failed or found nothing.
pub const UNKNOWN_MEMBER_NAME: &str = "Unknown member";

/// A club member row: the membership plus the per-row outcome of
/// profile hydration.
#[derive(Debug, Clone)]
pub struct ClubMember {
    pub membership: Membership,
    pub profile: Result<Option<UserProfile>, ProfileLookupError>,
}

impl ClubMember {
    /// Display name with a placeholder fallback when hydration failed
    /// or the user is unknown.
    pub fn display_name(&self) -> &str {
        match &self.profile {
            Ok(Some(profile)) => &profile.display_name,
            _ => UNKNOWN_MEMBER_NAME,
        }
    }

    /// Email when hydration succeeded.
    pub fn email(&self) -> Option<&str> {
        match &self.profile {
            Ok(Some(profile)) => Some(&profile.email),
            _ => None,
        }
    }
}

/// One page of a club member listing.
#[derive(Debug)]
pub struct MemberPage {
    pub members: Vec<ClubMember>,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::membership::{MembershipRole, MembershipStatus};
    use chrono::Utc;

    fn membership() -> Membership {
        Membership {
            membership_id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: MembershipRole::Member,
            status: MembershipStatus::Active,
            joined_at: Utc::now(),
            updated_at: Utc::now(),
            join_message: None,
            invited_by: None,
            processed_by: None,
            processed_at: None,
            reason: None,
        }
    }

    #[test]
    fn test_display_name_hydrated() {
        let member = ClubMember {
            membership: membership(),
            profile: Ok(Some(UserProfile {
                display_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                avatar_url: None,
            })),
        };
        assert_eq!(member.display_name(), "Ada");
        assert_eq!(member.email(), Some("ada@example.com"));
    }

    #[test]
    fn test_display_name_placeholder_on_failure() {
        let member = ClubMember {
            membership: membership(),
            profile: Err(ProfileLookupError::Unavailable("timeout".to_string())),
        };
        assert_eq!(member.display_name(), UNKNOWN_MEMBER_NAME);
        assert_eq!(member.email(), None);
    }

    #[test]
    fn test_display_name_placeholder_on_unknown_user() {
        let member = ClubMember {
            membership: membership(),
            profile: Ok(None),
        };
        assert_eq!(member.display_name(), UNKNOWN_MEMBER_NAME);
    }
}
