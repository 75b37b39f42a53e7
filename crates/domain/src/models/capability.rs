//! Capability model and the role -> capability resolver.
//!
//! Resolution is a pure lookup into static tables; no I/O, no state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::membership::MembershipRole;
use super::principal::SystemRole;

/// A named permission grant derived from a principal's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    // Club scope
    ViewMembers,
    RemoveMembers,
    ManageClub,
    // System scope
    ManagePlatform,
    ManageAllClubs,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewMembers => "view_members",
            Capability::RemoveMembers => "remove_members",
            Capability::ManageClub => "manage_club",
            Capability::ManagePlatform => "manage_platform",
            Capability::ManageAllClubs => "manage_all_clubs",
        }
    }

    /// Returns true for capabilities that are scoped to a single club
    /// and therefore resolved from the caller's club role.
    pub fn is_club_scoped(&self) -> bool {
        matches!(
            self,
            Capability::ViewMembers | Capability::RemoveMembers | Capability::ManageClub
        )
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capabilities granted by a role within a club.
pub fn club_role_capabilities(role: MembershipRole) -> HashSet<Capability> {
    match role {
        MembershipRole::Member => HashSet::new(),
        MembershipRole::Admin => {
            HashSet::from([Capability::ViewMembers, Capability::RemoveMembers])
        }
        MembershipRole::Owner => HashSet::from([
            Capability::ViewMembers,
            Capability::RemoveMembers,
            Capability::ManageClub,
        ]),
    }
}

/// Capabilities granted by a system-level role.
pub fn system_role_capabilities(role: SystemRole) -> HashSet<Capability> {
    match role {
        SystemRole::User => HashSet::new(),
        SystemRole::Admin => {
            HashSet::from([Capability::ManagePlatform, Capability::ManageAllClubs])
        }
    }
}
