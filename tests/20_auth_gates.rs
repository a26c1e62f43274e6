mod common;

use axum::http::{Method, StatusCode};
use gamevault_api::models::user::UserRole;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = common::test_app();

    let response = app
        .oneshot(common::get("/auth/profile"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Missing authentication token"));
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = common::test_app();

    let response = app
        .oneshot(common::get_with_token("/auth/profile", "not.a.token"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::read_json(response).await;
    assert_eq!(body["message"], json!("Invalid or expired token"));
}

#[tokio::test]
async fn admin_route_reports_role_context_to_lesser_roles() {
    let app = common::test_app();
    let token = common::token_for(UserRole::User);

    let response = app
        .oneshot(common::get_with_token("/auth/users", &token))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = common::read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["requiredRoles"], json!(["admin"]));
    assert_eq!(body["userRole"], json!("user"));
}

#[tokio::test]
async fn moderator_cannot_delete_games() {
    let app = common::test_app();
    let token = common::token_for(UserRole::Moderator);

    let response = app
        .oneshot(common::json_request_with_token(
            Method::DELETE,
            "/games/550e8400-e29b-41d4-a716-446655440000",
            &token,
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = common::read_json(response).await;
    assert_eq!(body["requiredRoles"], json!(["admin"]));
    assert_eq!(body["userRole"], json!("moderator"));
}

#[tokio::test]
async fn user_role_cannot_create_games() {
    let app = common::test_app();
    let token = common::token_for(UserRole::User);

    let response = app
        .oneshot(common::json_request_with_token(
            Method::POST,
            "/games",
            &token,
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = common::read_json(response).await;
    assert_eq!(body["requiredRoles"], json!(["admin", "moderator"]));
}

#[tokio::test]
async fn create_without_token_is_unauthorized_not_forbidden() {
    let app = common::test_app();

    let response = app
        .oneshot(common::json_request(Method::POST, "/games", json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn audit_routes_are_admin_only() {
    let app = common::test_app();
    let token = common::token_for(UserRole::Moderator);

    let response = app
        .oneshot(common::get_with_token("/audit/logs", &token))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
