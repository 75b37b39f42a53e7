//! Club management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    Capability, Club, ClubPage, CreateClubRequest, CreateMembershipRequest, ListClubsQuery,
    MembershipRole, MembershipStatus, UpdateClubRequest,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Create a new club.
///
/// POST /api/v1/clubs
///
/// The creator becomes the club's active owner. The name-uniqueness
/// check and the create are deliberately check-then-act; the narrow
/// race window is accepted.
pub async fn create_club(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<Club>), ApiError> {
    request.validate()?;

    if !state.clubs.is_name_unique(&request.name, None).await? {
        return Err(ApiError::Conflict(
            "A club with this name already exists".to_string(),
        ));
    }

    let club = state.clubs.create(&request).await?;
    state
        .memberships
        .create(
            club.id,
            auth.principal.user_id,
            &CreateMembershipRequest::default(),
            MembershipRole::Owner,
            MembershipStatus::Active,
        )
        .await?;

    info!(
        club_id = %club.id,
        name = %club.name,
        user_id = %auth.principal.user_id,
        "Club created with owner membership"
    );

    Ok((StatusCode::CREATED, Json(club)))
}

/// List clubs in name order with cursor pagination.
///
/// GET /api/v1/clubs
pub async fn list_clubs(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListClubsQuery>,
) -> Result<Json<ClubPage>, ApiError> {
    let page = state.clubs.list(&query).await?;
    Ok(Json(page))
}

/// Fetch one club.
///
/// GET /api/v1/clubs/:club_id
pub async fn get_club(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(club_id): Path<Uuid>,
) -> Result<Json<Club>, ApiError> {
    let club = state
        .clubs
        .get_by_id(club_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Club {} not found", club_id)))?;
    Ok(Json(club))
}

/// Update a club (fields and/or status transition).
///
/// PATCH /api/v1/clubs/:club_id
///
/// Requires `manage_club` in the club; platform administrators may
/// act on any club.
pub async fn update_club(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(club_id): Path<Uuid>,
    Json(request): Json<UpdateClubRequest>,
) -> Result<Json<Club>, ApiError> {
    request.validate()?;
    state
        .authz
        .require(&auth.principal, Capability::ManageClub, Some(club_id))
        .await?;

    if let Some(name) = &request.name {
        if !state.clubs.is_name_unique(name, Some(club_id)).await? {
            return Err(ApiError::Conflict(
                "A club with this name already exists".to_string(),
            ));
        }
    }

    let club = state.clubs.update(club_id, request.into()).await?;

    info!(club_id = %club.id, user_id = %auth.principal.user_id, "Club updated");
    Ok(Json(club))
}
