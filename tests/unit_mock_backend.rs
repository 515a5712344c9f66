use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sekolah::testing::{MockBackend, mock_router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, body)
}

fn create_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/permission-overrides")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_created_override_uses_backend_id_field() {
    let backend = MockBackend::new();
    let (status, body) = send(
        mock_router(backend.clone()),
        create_request(json!({
            "target_type": "role",
            "target_id": "Guru",
            "resource_key": "nilai",
            "view": true,
            "create": false,
            "edit": true,
            "delete": false
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id_override"], 1);
    assert!(body.get("id").is_none());
    assert_eq!(backend.store.len(), 1);
}

#[tokio::test]
async fn test_list_filters_by_target() {
    let backend = MockBackend::new();
    for target_id in ["Guru", "Siswa"] {
        send(
            mock_router(backend.clone()),
            create_request(json!({
                "target_type": "role",
                "target_id": target_id,
                "resource_key": "jadwal",
                "view": true,
                "create": false,
                "edit": false,
                "delete": false
            })),
        )
        .await;
    }

    let request = Request::builder()
        .uri("/v1/permission-overrides?target_type=role&target_id=Siswa")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(mock_router(backend), request).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["target_id"], "Siswa");
}

#[tokio::test]
async fn test_unknown_role_target_is_rejected() {
    let backend = MockBackend::new();
    let (status, body) = send(
        mock_router(backend.clone()),
        create_request(json!({
            "target_type": "role",
            "target_id": "Penjaga",
            "resource_key": "nilai",
            "view": true,
            "create": false,
            "edit": false,
            "delete": false
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
    assert!(backend.store.is_empty());
}

#[tokio::test]
async fn test_delete_missing_override_is_not_found() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/permission-overrides/999")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(mock_router(MockBackend::new()), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let request = Request::builder()
        .method("PUT")
        .uri("/v1/permission-overrides/abc")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "view": true, "create": false, "edit": false, "delete": false }).to_string(),
        ))
        .unwrap();
    let (status, _) = send(mock_router(MockBackend::new()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
