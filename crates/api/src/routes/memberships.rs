//! Current-user membership routes.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::{Membership, MembershipStatus};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Query parameters for the caller's membership listing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct MyMembershipsQuery {
    pub status: Option<MembershipStatus>,
}

/// Response for the caller's membership listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MyMembershipsResponse {
    pub memberships: Vec<Membership>,
}

/// List the caller's memberships across clubs.
///
/// GET /api/v1/users/me/memberships
pub async fn list_my_memberships(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<MyMembershipsQuery>,
) -> Result<Json<MyMembershipsResponse>, ApiError> {
    let memberships = state
        .memberships
        .list_user_memberships(auth.principal.user_id, query.status)
        .await?;

    Ok(Json(MyMembershipsResponse { memberships }))
}
