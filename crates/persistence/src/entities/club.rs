//! Club record payloads.

use chrono::{DateTime, Utc};
use domain::models::{normalize_club_name, Club, ClubStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const RECORD_TYPE_CLUB: &str = "CLUB";
pub const RECORD_TYPE_CLUB_NAME_INDEX: &str = "CLUB_NAME_INDEX";

/// Stored payload of a club, used both for the canonical record and
/// the name-index record (full projection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubRecord {
    pub record_type: String,
    pub id: Uuid,
    pub name: String,
    pub normalized_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub status: ClubStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClubRecord {
    fn from_club(club: &Club, record_type: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            id: club.id,
            name: club.name.clone(),
            normalized_name: normalize_club_name(&club.name),
            description: club.description.clone(),
            city: club.city.clone(),
            logo_url: club.logo_url.clone(),
            status: club.status,
            created_at: club.created_at,
            updated_at: club.updated_at,
        }
    }

    /// Payload of the canonical record.
    pub fn canonical(club: &Club) -> Self {
        Self::from_club(club, RECORD_TYPE_CLUB)
    }

    /// Payload of the name-index record.
    pub fn name_index(club: &Club) -> Self {
        Self::from_club(club, RECORD_TYPE_CLUB_NAME_INDEX)
    }
}

impl From<ClubRecord> for Club {
    fn from(record: ClubRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            city: record.city,
            logo_url: record.logo_url,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
