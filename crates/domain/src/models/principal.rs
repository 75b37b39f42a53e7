//! Authenticated principal consumed by the authorization service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// System-level (platform) role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemRole {
    User,
    Admin,
}

impl SystemRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemRole::User => "user",
            SystemRole::Admin => "admin",
        }
    }
}

impl FromStr for SystemRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(SystemRole::User),
            "admin" => Ok(SystemRole::Admin),
            _ => Err(format!("Invalid system role: {}", s)),
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Principal built by the request-handling layer from token claims.
/// Consumed read-only by the authorization service.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: SystemRole,
    pub is_authenticated: bool,
}

impl Principal {
    /// An authenticated principal with the given role.
    pub fn authenticated(user_id: Uuid, role: SystemRole) -> Self {
        Self {
            user_id,
            role,
            is_authenticated: true,
        }
    }
}
