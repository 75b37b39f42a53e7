//! Club domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_club_name;

/// Lifecycle status of a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubStatus {
    Active,
    Suspended,
    Archived,
}

impl ClubStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubStatus::Active => "active",
            ClubStatus::Suspended => "suspended",
            ClubStatus::Archived => "archived",
        }
    }

    /// Returns true if `self -> to` is an allowed status transition.
    ///
    /// Archived is terminal; active and suspended can move between
    /// each other and into archived.
    pub fn can_transition_to(&self, to: ClubStatus) -> bool {
        match (self, to) {
            (ClubStatus::Active, ClubStatus::Suspended) => true,
            (ClubStatus::Active, ClubStatus::Archived) => true,
            (ClubStatus::Suspended, ClubStatus::Active) => true,
            (ClubStatus::Suspended, ClubStatus::Archived) => true,
            (ClubStatus::Archived, _) => false,
            _ => false,
        }
    }
}

impl FromStr for ClubStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ClubStatus::Active),
            "suspended" => Ok(ClubStatus::Suspended),
            "archived" => Ok(ClubStatus::Archived),
            _ => Err(format!("Invalid club status: {}", s)),
        }
    }
}

impl fmt::Display for ClubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Club domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub status: ClubStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derives the normalized form of a club name: trimmed and
/// lower-cased. Used only for indexing and uniqueness checks, never
/// shown to users.
pub fn normalize_club_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Request payload for creating a club.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateClubRequest {
    #[validate(custom(function = "validate_club_name"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub city: Option<String>,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,
}

/// Request payload for updating a club. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateClubRequest {
    #[validate(custom(function = "validate_club_name"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub city: Option<String>,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,

    pub status: Option<ClubStatus>,
}

/// Typed patch applied by the repository's merge-and-rewrite update.
/// Each field is either present-with-value or absent.
#[derive(Debug, Clone, Default)]
pub struct ClubPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub status: Option<ClubStatus>,
}

impl ClubPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.city.is_none()
            && self.logo_url.is_none()
            && self.status.is_none()
    }
}

impl From<UpdateClubRequest> for ClubPatch {
    fn from(request: UpdateClubRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            city: request.city,
            logo_url: request.logo_url,
            status: request.status,
        }
    }
}

/// Query parameters for listing clubs.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListClubsQuery {
    pub status: Option<ClubStatus>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

/// One page of a club listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubPage {
    pub clubs: Vec<Club>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ClubStatus::Suspended).unwrap(),
            "\"suspended\""
        );
        let status: ClubStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, ClubStatus::Archived);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(ClubStatus::from_str("active").unwrap(), ClubStatus::Active);
        assert_eq!(
            ClubStatus::from_str("SUSPENDED").unwrap(),
            ClubStatus::Suspended
        );
        assert!(ClubStatus::from_str("deleted").is_err());
    }

    #[test]
    fn test_status_transition_table() {
        use ClubStatus::*;

        let allowed = [
            (Active, Suspended),
            (Active, Archived),
            (Suspended, Active),
            (Suspended, Archived),
        ];
        let all = [Active, Suspended, Archived];

        for from in all {
            for to in all {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "transition {} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_archived_is_terminal() {
        assert!(!ClubStatus::Archived.can_transition_to(ClubStatus::Active));
        assert!(!ClubStatus::Archived.can_transition_to(ClubStatus::Suspended));
        assert!(!ClubStatus::Archived.can_transition_to(ClubStatus::Archived));
    }

    #[test]
    fn test_normalize_club_name() {
        assert_eq!(normalize_club_name("Velo Club"), "velo club");
        assert_eq!(normalize_club_name("  Velo Club  "), "velo club");
        assert_eq!(normalize_club_name("CHESS"), "chess");
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateClubRequest {
            name: "Velo Club".to_string(),
            description: Some("Road cycling in the city".to_string()),
            city: Some("Sydney".to_string()),
            logo_url: Some("https://example.com/logo.png".to_string()),
        };
        assert!(valid.validate().is_ok());

        let blank_name = CreateClubRequest {
            name: "   ".to_string(),
            description: None,
            city: None,
            logo_url: None,
        };
        assert!(blank_name.validate().is_err());

        let bad_url = CreateClubRequest {
            name: "Velo Club".to_string(),
            description: None,
            city: None,
            logo_url: Some("not a url".to_string()),
        };
        assert!(bad_url.validate().is_err());

        let long_description = CreateClubRequest {
            name: "Velo Club".to_string(),
            description: Some("d".repeat(501)),
            city: None,
            logo_url: None,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_patch_from_update_request() {
        let patch: ClubPatch = UpdateClubRequest {
            name: Some("New Name".to_string()),
            status: Some(ClubStatus::Suspended),
            ..Default::default()
        }
        .into();

        assert_eq!(patch.name.as_deref(), Some("New Name"));
        assert_eq!(patch.status, Some(ClubStatus::Suspended));
        assert!(patch.description.is_none());
        assert!(!patch.is_empty());
        assert!(ClubPatch::default().is_empty());
    }

    #[test]
    fn test_club_serialization() {
        let club = Club {
            id: Uuid::nil(),
            name: "Velo Club".to_string(),
            description: None,
            city: Some("Sydney".to_string()),
            logo_url: None,
            status: ClubStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&club).unwrap();
        assert!(json.contains("\"status\":\"active\""));
        assert!(json.contains("\"city\":\"Sydney\""));
    }
}
