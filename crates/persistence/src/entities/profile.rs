//! User profile record payload.
//!
//! Profile records are maintained by an external user service and
//! read here only for member-list enrichment.

use domain::models::UserProfile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const RECORD_TYPE_USER_PROFILE: &str = "USER_PROFILE";

/// Stored payload of a user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileRecord {
    pub record_type: String,
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserProfileRecord {
    pub fn new(user_id: Uuid, display_name: &str, email: &str, avatar_url: Option<&str>) -> Self {
        Self {
            record_type: RECORD_TYPE_USER_PROFILE.to_string(),
            user_id,
            display_name: display_name.to_string(),
            email: email.to_string(),
            avatar_url: avatar_url.map(str::to_string),
        }
    }
}

impl From<UserProfileRecord> for UserProfile {
    fn from(record: UserProfileRecord) -> Self {
        Self {
            display_name: record.display_name,
            email: record.email,
            avatar_url: record.avatar_url,
        }
    }
}
