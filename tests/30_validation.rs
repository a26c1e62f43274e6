mod common;

use axum::http::{Method, StatusCode};
use gamevault_api::models::user::UserRole;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn register_rejects_invalid_fields_with_per_field_errors() {
    let app = common::test_app();

    let response = app
        .oneshot(common::json_request(
            Method::POST,
            "/auth/register",
            json!({
                "username": "ab",
                "email": "not-an-email",
                "password": "123"
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::read_json(response).await;
    assert_eq!(body["success"], json!(false));
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e["field"].as_str().expect("field"))
        .collect();
    assert_eq!(fields, vec!["username", "email", "password"]);
}

#[tokio::test]
async fn game_creation_rejects_out_of_range_fields() {
    let app = common::test_app();
    let token = common::token_for(UserRole::Moderator);

    let response = app
        .oneshot(common::json_request_with_token(
            Method::POST,
            "/games",
            &token,
            json!({
                "title": "X",
                "description": "too short",
                "genre": "Roguelike",
                "platform": [],
                "releaseYear": 1950,
                "publisher": "",
                "rating": 11.0,
                "price": -5.0
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::read_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e["field"].as_str().expect("field"))
        .collect();
    for field in [
        "title",
        "description",
        "genre",
        "platform",
        "releaseYear",
        "publisher",
        "rating",
        "price",
    ] {
        assert!(fields.contains(&field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn empty_game_update_is_rejected() {
    let app = common::test_app();
    let token = common::token_for(UserRole::Admin);

    let response = app
        .oneshot(common::json_request_with_token(
            Method::PUT,
            "/games/550e8400-e29b-41d4-a716-446655440000",
            &token,
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::read_json(response).await;
    assert_eq!(body["errors"][0]["field"], json!("body"));
}

#[tokio::test]
async fn invalid_role_value_is_a_client_error() {
    let app = common::test_app();
    let token = common::token_for(UserRole::Admin);

    let response = app
        .oneshot(common::json_request_with_token(
            Method::PATCH,
            "/auth/users/550e8400-e29b-41d4-a716-446655440000/role",
            &token,
            json!({ "role": "superuser" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn audit_purge_rejects_non_positive_windows() {
    let app = common::test_app();
    let token = common::token_for(UserRole::Admin);

    let response = app
        .oneshot(common::json_request_with_token(
            Method::DELETE,
            "/audit/logs?days=0",
            &token,
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
