mod helpers;

use axum::http::StatusCode;
use helpers::setup_test_app;

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}
