//! Club member routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::{
    Capability, ClubMember, ClubStatus, CreateMembershipRequest, ListClubMembersQuery, Membership,
    MembershipRole, MembershipStatus, MembershipStatusChange, UpdateMemberRequest,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// One member row with profile fields; placeholders when hydration
/// failed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberView {
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub profile_hydrated: bool,
}

impl From<&ClubMember> for MemberView {
    fn from(member: &ClubMember) -> Self {
        let profile = match &member.profile {
            Ok(Some(profile)) => Some(profile),
            _ => None,
        };
        Self {
            membership_id: member.membership.membership_id,
            user_id: member.membership.user_id,
            role: member.membership.role,
            status: member.membership.status,
            joined_at: member.membership.joined_at,
            display_name: member.display_name().to_string(),
            email: profile.map(|p| p.email.clone()),
            avatar_url: profile.and_then(|p| p.avatar_url.clone()),
            profile_hydrated: profile.is_some(),
        }
    }
}

/// Response for member listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMembersResponse {
    pub members: Vec<MemberView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// List members of a club.
///
/// GET /api/v1/clubs/:club_id/members
///
/// Requires `view_members`. Role filters use the member index's
/// role-prefixed sort key; status filters apply after the scan.
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(club_id): Path<Uuid>,
    Query(query): Query<ListClubMembersQuery>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    state
        .authz
        .require(&auth.principal, Capability::ViewMembers, Some(club_id))
        .await?;

    let page = state
        .memberships
        .list_club_members(club_id, &query, state.directory.clone())
        .await?;

    Ok(Json(ListMembersResponse {
        members: page.members.iter().map(MemberView::from).collect(),
        next_cursor: page.next_cursor,
    }))
}

/// Request to join a club (self-service).
///
/// POST /api/v1/clubs/:club_id/members
///
/// Creates a pending member membership. Re-joining after a removed
/// membership is allowed; a live membership conflicts.
pub async fn join_club(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(club_id): Path<Uuid>,
    Json(request): Json<CreateMembershipRequest>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    request.validate()?;

    let club = state
        .clubs
        .get_by_id(club_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Club {} not found", club_id)))?;
    if club.status != ClubStatus::Active {
        return Err(ApiError::Conflict(
            "Club is not accepting new members".to_string(),
        ));
    }

    let user_id = auth.principal.user_id;
    // Check-then-act: the conditioned create still rejects a record
    // that appeared in the window.
    let existing = state
        .memberships
        .get_by_club_and_user(club_id, user_id)
        .await?;
    let membership = match existing {
        None => {
            state
                .memberships
                .create(
                    club_id,
                    user_id,
                    &request,
                    MembershipRole::Member,
                    MembershipStatus::Pending,
                )
                .await?
        }
        Some(previous) if previous.status == MembershipStatus::Removed => {
            state
                .memberships
                .recreate(
                    &previous,
                    &request,
                    MembershipRole::Member,
                    MembershipStatus::Pending,
                )
                .await?
        }
        Some(_) => {
            return Err(ApiError::Conflict(
                "User already has a membership in this club".to_string(),
            ))
        }
    };

    info!(club_id = %club_id, user_id = %user_id, "Join request created");
    Ok((StatusCode::CREATED, Json(membership)))
}

/// Update a member's status or role.
///
/// PATCH /api/v1/clubs/:club_id/members/:user_id
///
/// Status changes (approve/reject/remove) require `remove_members`,
/// except a member removing their own membership (leave). Role
/// changes require `manage_club` and bust the capability cache for
/// the affected user.
pub async fn update_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((club_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<Membership>, ApiError> {
    request.validate()?;

    let membership = match (request.status, request.role) {
        (Some(status), None) => {
            let self_leave =
                status == MembershipStatus::Removed && user_id == auth.principal.user_id;
            if !self_leave {
                state
                    .authz
                    .require(&auth.principal, Capability::RemoveMembers, Some(club_id))
                    .await?;
            }
            state
                .memberships
                .update_status(
                    club_id,
                    user_id,
                    MembershipStatusChange {
                        status,
                        processed_by: auth.principal.user_id,
                        reason: request.reason,
                    },
                )
                .await?
        }
        (None, Some(role)) => {
            state
                .authz
                .require(&auth.principal, Capability::ManageClub, Some(club_id))
                .await?;
            let updated = state
                .memberships
                .update_role(club_id, user_id, role, auth.principal.user_id)
                .await?;
            // Cached grants may still reflect the old role.
            state.authz.invalidate_user(user_id);
            updated
        }
        _ => {
            return Err(ApiError::Validation(
                "Provide exactly one of status or role".to_string(),
            ))
        }
    };

    info!(
        club_id = %club_id,
        user_id = %user_id,
        processed_by = %auth.principal.user_id,
        "Membership updated"
    );
    Ok(Json(membership))
}
