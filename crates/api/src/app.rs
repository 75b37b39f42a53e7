//! Application state and router wiring.

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::models::UserDirectory;
use domain::services::{CapabilityCache, SystemClock};
use persistence::repositories::{ClubRepository, MembershipRepository, StoreUserDirectory};
use persistence::store::StoreClient;
use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::routes::{clubs, health, members, memberships};
use crate::services::AuthorizationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn StoreClient>,
    pub clubs: ClubRepository,
    pub memberships: MembershipRepository,
    pub directory: Arc<dyn UserDirectory>,
    pub authz: Arc<AuthorizationService>,
    pub capabilities: Arc<CapabilityCache>,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    /// Wires repositories and services over the given store backend.
    pub fn new(config: Config, store: Arc<dyn StoreClient>) -> Self {
        let config = Arc::new(config);
        let jwt = Arc::new(JwtConfig::with_leeway(
            &config.auth.jwt_secret,
            config.auth.access_token_expiry_secs,
            config.auth.leeway_secs,
        ));
        let capabilities = Arc::new(CapabilityCache::new(
            Duration::from_secs(config.cache.capability_ttl_secs),
            Arc::new(SystemClock),
        ));
        let clubs = ClubRepository::new(store.clone());
        let memberships = MembershipRepository::new(store.clone());
        let directory: Arc<dyn UserDirectory> = Arc::new(StoreUserDirectory::new(store.clone()));
        let authz = Arc::new(AuthorizationService::new(
            capabilities.clone(),
            memberships.clone(),
        ));

        Self {
            config,
            store,
            clubs,
            memberships,
            directory,
            authz,
            capabilities,
            jwt,
        }
    }
}

/// Builds the router over the given state.
pub fn create_app(state: AppState) -> Router {
    // CORS: open in development, restricted when origins are listed.
    let cors = if state.config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = state
            .config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let timeout = TimeoutLayer::new(Duration::from_secs(
        state.config.server.request_timeout_secs,
    ));

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route(
            "/api/v1/clubs",
            post(clubs::create_club).get(clubs::list_clubs),
        )
        .route(
            "/api/v1/clubs/:club_id",
            get(clubs::get_club).patch(clubs::update_club),
        )
        .route(
            "/api/v1/clubs/:club_id/members",
            get(members::list_members).post(members::join_club),
        )
        .route(
            "/api/v1/clubs/:club_id/members/:user_id",
            patch(members::update_member),
        )
        .route(
            "/api/v1/users/me/memberships",
            get(memberships::list_my_memberships),
        )
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        .with_state(state)
}
