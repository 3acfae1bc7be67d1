//! API integration tests for mirror-server.
//!
//! These tests drive the HTTP API with realistic multipart and JSON
//! requests, covering the full upload / contribute / mirror / retrieve
//! lifecycle through the REST endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mirror_core::Registry;
use mirror_server::{create_router, create_router_with_state, AppState, Config};

/// Helper to create a multipart body for a dataset upload
fn create_upload_multipart(
    title: &str,
    description: &str,
    filename: &str,
    content: &[u8],
) -> (String, Vec<u8>) {
    let boundary = "----TestBoundary7MA4YWxkTrZu0gW";
    let mut body = Vec::new();

    // Title field
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"title\"\r\n\r\n");
    body.extend_from_slice(title.as_bytes());
    body.extend_from_slice(b"\r\n");

    // Description field
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"description\"\r\n\r\n");
    body.extend_from_slice(description.as_bytes());
    body.extend_from_slice(b"\r\n");

    // File field
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");

    // End boundary
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}

/// Upload a dataset and return the parsed response body
async fn upload_dataset(app: &Router, title: &str, description: &str, content: &[u8]) -> Value {
    let (content_type, body) = create_upload_multipart(title, description, "data.csv", content);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/datasets")
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Register a contributor for a dataset, returning (status, body)
async fn register_contributor(
    app: &Router,
    dataset_id: &str,
    name: &str,
    email: &str,
    host_link: &str,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/datasets/{}/contributors", dataset_id))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({ "name": name, "email": email, "host_link": host_link }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Health & Documentation Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok() {
    let app = create_router();

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_spec_endpoint() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert!(json["openapi"].as_str().unwrap().starts_with("3."));
    assert!(json["paths"]["/datasets"].is_object());
    assert!(json["paths"]["/datasets/{id}/content"].is_object());
    assert!(json["paths"]["/datasets/{id}/contributors"].is_object());
}

// ============================================================================
// Upload & List Tests
// ============================================================================

#[tokio::test]
async fn test_list_starts_empty() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/datasets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_upload_creates_hosted_dataset() {
    let app = create_router();

    let dataset = upload_dataset(&app, "Potholes 2024", "pothole locations", b"lat,lon\n1,2").await;

    assert!(dataset["id"].is_string());
    assert_eq!(dataset["title"], "Potholes 2024");
    assert_eq!(dataset["state"], "HOSTED");
    assert_eq!(dataset["verified_host_count"], 0);
    assert_eq!(dataset["original_filename"], "data.csv");
    assert_eq!(dataset["content_hash"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_same_bytes_same_hash_distinct_ids() {
    let app = create_router();

    let a = upload_dataset(&app, "First", "desc", b"identical bytes").await;
    let b = upload_dataset(&app, "Second", "desc", b"identical bytes").await;

    assert_ne!(a["id"], b["id"]);
    assert_eq!(a["content_hash"], b["content_hash"]);
}

#[tokio::test]
async fn test_upload_missing_title_is_rejected() {
    let app = create_router();

    // Multipart with description and file only
    let boundary = "----TestBoundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\ndesc\r\n--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"d.csv\"\r\nContent-Type: text/csv\r\n\r\ndata\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/datasets")
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_empty_file_is_rejected() {
    let app = create_router();

    let (content_type, body) = create_upload_multipart("Title", "desc", "d.csv", b"");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/datasets")
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_configured_upload_limit_is_enforced() {
    let config = Config {
        max_file_size_mb: 1,
        ..Config::default()
    };
    let state = AppState::new(
        Arc::new(Registry::in_memory()),
        config.max_file_size_bytes(),
    );
    let app = create_router_with_state(&config, state);

    let oversized = vec![b'x'; config.max_file_size_bytes() + 1];
    let (content_type, body) = create_upload_multipart("Big", "too big", "big.csv", &oversized);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/datasets")
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("File too large"));
}

#[tokio::test]
async fn test_list_preserves_upload_order() {
    let app = create_router();

    let a = upload_dataset(&app, "first", "d", b"1").await;
    let b = upload_dataset(&app, "second", "d", b"2").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/datasets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    let list = json.as_array().unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], a["id"]);
    assert_eq!(list[1]["id"], b["id"]);
}

// ============================================================================
// Retrieval Tests
// ============================================================================

#[tokio::test]
async fn test_hosted_dataset_downloads_directly() {
    let app = create_router();

    let content = b"lat,lon\n48.85,2.35";
    let dataset = upload_dataset(&app, "Potholes 2024", "pothole locations", content).await;
    let id = dataset["id"].as_str().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/datasets/{}/content", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("data.csv"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], content);
}

#[tokio::test]
async fn test_download_unknown_dataset_is_404() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/datasets/550e8400-e29b-41d4-a716-446655440000/content")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Contribution & Mirroring Tests
// ============================================================================

#[tokio::test]
async fn test_fifth_contributor_mirrors_the_dataset() {
    let app = create_router();

    let dataset = upload_dataset(&app, "Potholes 2024", "pothole locations", b"data").await;
    let id = dataset["id"].as_str().unwrap();

    // Four distinct contributors: still hosted
    for i in 0..4 {
        let (status, body) = register_contributor(
            &app,
            id,
            &format!("host {}", i),
            &format!("host{}@example.org", i),
            &format!("https://host{}.example.org/d.csv", i),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["created"], true);
        assert_eq!(body["verified_host_count"], i + 1);
        assert_eq!(body["state"], "HOSTED");
    }

    // Fifth distinct contributor flips the state
    let (status, body) = register_contributor(
        &app,
        id,
        "host 4",
        "host4@example.org",
        "https://host4.example.org/d.csv",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["verified_host_count"], 5);
    assert_eq!(body["state"], "MIRRORED");

    // Retrieval now redirects to one of the registered links
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/datasets/{}/content", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("https://host"));
    assert!(location.ends_with(".example.org/d.csv"));

    // The list reflects the new state and count
    let response = app
        .oneshot(
            Request::builder()
                .uri("/datasets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json[0]["state"], "MIRRORED");
    assert_eq!(json[0]["verified_host_count"], 5);
}

#[tokio::test]
async fn test_redirects_cover_all_registered_mirrors() {
    let app = create_router();

    let dataset = upload_dataset(&app, "t", "d", b"data").await;
    let id = dataset["id"].as_str().unwrap();

    for i in 0..5 {
        register_contributor(
            &app,
            id,
            &format!("host {}", i),
            &format!("host{}@example.org", i),
            &format!("https://host{}.example.org/d.csv", i),
        )
        .await;
    }

    // Uniform sampling: over many retrievals every link shows up
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/datasets/{}/content", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        seen.insert(
            response
                .headers()
                .get("location")
                .unwrap()
                .to_str()
                .unwrap()
                .to_string(),
        );
    }
    assert_eq!(seen.len(), 5);
}

#[tokio::test]
async fn test_duplicate_contribution_is_idempotent() {
    let app = create_router();

    let dataset = upload_dataset(&app, "t", "d", b"data").await;
    let id = dataset["id"].as_str().unwrap();

    let (status, first) = register_contributor(
        &app,
        id,
        "Ada",
        "ada@example.org",
        "https://ada.example.org/d.csv",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["verified_host_count"], 1);

    let (status, dup) = register_contributor(
        &app,
        id,
        "Ada again",
        "ada@example.org",
        "https://ada.example.org/d.csv",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dup["created"], false);
    assert_eq!(dup["verified_host_count"], 1);
}

#[tokio::test]
async fn test_contribution_to_unknown_dataset_is_404() {
    let app = create_router();

    let (status, body) = register_contributor(
        &app,
        "550e8400-e29b-41d4-a716-446655440000",
        "Ada",
        "ada@example.org",
        "https://ada.example.org/d.csv",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_contribution_with_empty_email_is_rejected() {
    let app = create_router();

    let dataset = upload_dataset(&app, "t", "d", b"data").await;
    let id = dataset["id"].as_str().unwrap();

    let (status, body) =
        register_contributor(&app, id, "Ada", "  ", "https://ada.example.org/d.csv").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(dataset["verified_host_count"], 0);
}

// ============================================================================
// Edit & Delete Tests
// ============================================================================

#[tokio::test]
async fn test_edit_title_leaves_rest_untouched() {
    let app = create_router();

    let dataset = upload_dataset(&app, "Potholes 2024", "pothole locations", b"data").await;
    let id = dataset["id"].as_str().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/datasets/{}", id))
                .header("Content-Type", "application/json")
                .body(Body::from(json!({ "title": "Road Hazards 2024" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let updated: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(updated["title"], "Road Hazards 2024");
    assert_eq!(updated["description"], "pothole locations");
    assert_eq!(updated["content_hash"], dataset["content_hash"]);
}

#[tokio::test]
async fn test_edit_unknown_dataset_is_404() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/datasets/550e8400-e29b-41d4-a716-446655440000")
                .header("Content-Type", "application/json")
                .body(Body::from(json!({ "title": "x" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_hosted_dataset() {
    let app = create_router();

    let dataset = upload_dataset(&app, "t", "d", b"data").await;
    let id = dataset["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/datasets/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Record and bytes are gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/datasets/{}/content", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting again is NotFound
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/datasets/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_mirrored_dataset() {
    let app = create_router();

    let dataset = upload_dataset(&app, "t", "d", b"data").await;
    let id = dataset["id"].as_str().unwrap();

    for i in 0..5 {
        register_contributor(
            &app,
            id,
            &format!("host {}", i),
            &format!("host{}@example.org", i),
            &format!("https://host{}.example.org/d.csv", i),
        )
        .await;
    }

    // The blob is already gone; deletion must still succeed
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/datasets/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/datasets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 0);
}
