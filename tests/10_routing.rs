mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn root_describes_the_service() {
    let app = common::test_app();

    let response = app.oneshot(common::get("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("GameVault API"));
}

#[tokio::test]
async fn unmatched_routes_name_method_and_path() {
    let app = common::test_app();

    let response = app
        .oneshot(common::get("/no/such/route"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = common::read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Route not found: GET /no/such/route"));
}

#[tokio::test]
async fn malformed_game_id_is_a_client_error() {
    let app = common::test_app();

    let response = app
        .oneshot(common::get("/games/not-a-uuid"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::read_json(response).await;
    assert_eq!(body["success"], json!(false));
}
