//! Bearer-token authentication extractor.
//!
//! Validates the JWT in the Authorization header and builds the
//! [`Principal`] consumed by the authorization service. Token
//! issuance belongs to the upstream identity service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{Principal, SystemRole};
use std::str::FromStr;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller context extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.jwt.validate_access_token(token).map_err(|e| {
            tracing::debug!("Token validation failed: {}", e);
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;
        let role = SystemRole::from_str(&claims.role)
            .map_err(|_| ApiError::Unauthorized("Invalid role in token".to_string()))?;

        Ok(AuthContext {
            principal: Principal::authenticated(user_id, role),
        })
    }
}
