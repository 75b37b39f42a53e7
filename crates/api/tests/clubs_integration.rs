//! Integration tests for club endpoints.
//!
//! The app runs against the in-memory store; each test builds a fresh
//! state, so tests are isolated and hermetic.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_club, create_test_app, create_test_state, send, TestUser};
use serde_json::json;
use std::collections::HashSet;

#[tokio::test]
async fn test_create_club_success() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let owner = TestUser::new(&state);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/clubs",
        Some(&owner.token),
        Some(json!({ "name": "Velo Club", "city": "Sydney" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["name"], "Velo Club");
    assert_eq!(body["city"], "Sydney");
    assert_eq!(body["status"], "active");

    // The creator holds the club's owner membership.
    let club_id = body["id"].as_str().unwrap();
    let members = send(
        &app,
        Method::GET,
        &format!("/api/v1/clubs/{}/members?role=owner", club_id),
        Some(&owner.token),
        None,
    )
    .await;
    assert_eq!(members.status(), StatusCode::OK);
    let members = body_json(members).await;
    assert_eq!(members["members"].as_array().unwrap().len(), 1);
    assert_eq!(
        members["members"][0]["user_id"],
        owner.id.to_string().as_str()
    );
    assert_eq!(members["members"][0]["status"], "active");
}

#[tokio::test]
async fn test_create_club_requires_auth() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/clubs",
        None,
        Some(json!({ "name": "Velo Club" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_club_rejects_name_variant() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let first = TestUser::new(&state);
    let second = TestUser::new(&state);

    create_club(&app, &first, "Velo Club").await;

    // Whitespace/case variant collides on the normalized name.
    let response = send(
        &app,
        Method::POST,
        "/api/v1/clubs",
        Some(&second.token),
        Some(json!({ "name": "  Velo Club  " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_club_rejects_blank_name() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let user = TestUser::new(&state);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/clubs",
        Some(&user.token),
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_club_not_found() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let user = TestUser::new(&state);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/clubs/{}", uuid::Uuid::new_v4()),
        Some(&user.token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_clubs_pagination_walk() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let user = TestUser::new(&state);

    for name in ["Athletics", "Bouldering", "Cricket", "Darts", "Enduro"] {
        create_club(&app, &user, name).await;
    }

    let mut names = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(cursor) => format!("/api/v1/clubs?limit=2&cursor={}", cursor),
            None => "/api/v1/clubs?limit=2".to_string(),
        };
        let response = send(&app, Method::GET, &uri, Some(&user.token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        for club in body["clubs"].as_array().unwrap() {
            names.push(club["name"].as_str().unwrap().to_string());
        }
        match body["next_cursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    // All five clubs, no duplicates, in name order.
    assert_eq!(
        names,
        vec!["Athletics", "Bouldering", "Cricket", "Darts", "Enduro"]
    );
    assert_eq!(names.iter().collect::<HashSet<_>>().len(), 5);
}

#[tokio::test]
async fn test_list_clubs_rejects_invalid_cursor() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let user = TestUser::new(&state);

    let response = send(
        &app,
        Method::GET,
        "/api/v1/clubs?cursor=not-a-cursor",
        Some(&user.token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_club_by_owner() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let owner = TestUser::new(&state);
    let club_id = create_club(&app, &owner, "Velo Club").await;

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/clubs/{}", club_id),
        Some(&owner.token),
        Some(json!({ "name": "Gravel Crew", "description": "Mixed surface rides" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Gravel Crew");
    assert_eq!(body["description"], "Mixed surface rides");

    // The old name is free again.
    let response = send(
        &app,
        Method::POST,
        "/api/v1/clubs",
        Some(&owner.token),
        Some(json!({ "name": "Velo Club" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_club_status_transitions() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let owner = TestUser::new(&state);
    let club_id = create_club(&app, &owner, "Velo Club").await;

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/clubs/{}", club_id),
        Some(&owner.token),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Archived is terminal.
    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/clubs/{}", club_id),
        Some(&owner.token),
        Some(json!({ "status": "active" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_club_requires_manage_capability() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let owner = TestUser::new(&state);
    let outsider = TestUser::new(&state);
    let club_id = create_club(&app, &owner, "Velo Club").await;

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/clubs/{}", club_id),
        Some(&outsider.token),
        Some(json!({ "description": "hijacked" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_platform_admin_can_update_any_club() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let owner = TestUser::new(&state);
    let platform_admin = TestUser::admin(&state);
    let club_id = create_club(&app, &owner, "Velo Club").await;

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/clubs/{}", club_id),
        Some(&platform_admin.token),
        Some(json!({ "status": "suspended" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "suspended");
}

#[tokio::test]
async fn test_rename_to_taken_name_conflicts() {
    let state = create_test_state();
    let app = create_test_app(&state);
    let owner = TestUser::new(&state);
    create_club(&app, &owner, "Velo Club").await;
    let other_id = create_club(&app, &owner, "Gravel Crew").await;

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/clubs/{}", other_id),
        Some(&owner.token),
        Some(json!({ "name": "velo club" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
