//! Authorization service.
//!
//! Answers "does this principal hold capability X", orchestrating the
//! capability cache (system scope) and the membership repository
//! (club scope). Fail-safe: every internal failure collapses to a
//! denied decision, never a grant and never an error.

use domain::models::{
    club_role_capabilities, Capability, MembershipStatus, Principal,
};
use domain::services::CapabilityCache;
use domain::{DomainError, DomainResult};
use persistence::repositories::MembershipRepository;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Outcome of an authorization check.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub granted: bool,
    pub reason: Option<String>,
}

impl AccessDecision {
    fn granted() -> Self {
        Self {
            granted: true,
            reason: None,
        }
    }

    fn denied(reason: impl Into<String>) -> Self {
        Self {
            granted: false,
            reason: Some(reason.into()),
        }
    }
}

/// Capability checks for request handlers.
pub struct AuthorizationService {
    capabilities: Arc<CapabilityCache>,
    memberships: MembershipRepository,
}

impl AuthorizationService {
    pub fn new(capabilities: Arc<CapabilityCache>, memberships: MembershipRepository) -> Self {
        Self {
            capabilities,
            memberships,
        }
    }

    /// Checks whether the principal holds the capability, scoped to a
    /// club when `club_id` is given. Never returns an error: an
    /// internal failure denies.
    pub async fn authorize(
        &self,
        principal: &Principal,
        capability: Capability,
        club_id: Option<Uuid>,
    ) -> AccessDecision {
        if !principal.is_authenticated {
            return AccessDecision::denied("Not authenticated");
        }

        match self.check(principal, capability, club_id).await {
            Ok(true) => AccessDecision::granted(),
            Ok(false) => {
                AccessDecision::denied(format!("Missing capability {}", capability))
            }
            Err(err) => {
                // Fail-safe: resolution failures must never grant.
                error!(
                    capability = %capability,
                    club_id = ?club_id,
                    error = %err,
                    "Authorization check failed; denying"
                );
                AccessDecision::denied("Authorization check failed")
            }
        }
    }

    /// Like [`authorize`](Self::authorize), but surfaces a denial as
    /// a domain authorization error carrying the missing capability
    /// and resource.
    pub async fn require(
        &self,
        principal: &Principal,
        capability: Capability,
        club_id: Option<Uuid>,
    ) -> DomainResult<()> {
        let decision = self.authorize(principal, capability, club_id).await;
        if decision.granted {
            Ok(())
        } else {
            Err(DomainError::Authorization {
                capability: capability.as_str().to_string(),
                resource: club_id,
            })
        }
    }

    async fn check(
        &self,
        principal: &Principal,
        capability: Capability,
        club_id: Option<Uuid>,
    ) -> DomainResult<bool> {
        if capability.is_club_scoped() {
            let Some(club_id) = club_id else {
                return Ok(false);
            };

            // Club-scoped checks read the caller's membership on every
            // call; only system-scope sets are cached.
            let membership = self
                .memberships
                .get_by_club_and_user(club_id, principal.user_id)
                .await?;
            if let Some(membership) = membership {
                if membership.status == MembershipStatus::Active
                    && club_role_capabilities(membership.role).contains(&capability)
                {
                    return Ok(true);
                }
            }

            // Platform administrators may act on any club.
            return Ok(self
                .capabilities
                .resolve(principal)
                .contains(&Capability::ManageAllClubs));
        }

        Ok(self.capabilities.resolve(principal).contains(&capability))
    }

    /// Drops every cached capability set for the user; called on role
    /// changes so stale grants do not outlive the TTL.
    pub fn invalidate_user(&self, user_id: Uuid) {
        self.capabilities.invalidate(user_id);
    }
}
