//! Integration tests for `GET /categories`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::body::Body;
use axum::http::StatusCode;
use serde_json::json;

use catalog_gateway_integration_tests::{StubBehavior, StubUpstream, send, tenant_request};

fn nested_tree() -> serde_json::Value {
    json!([
        { "id": 1, "name": "Clothing", "children": [
            { "id": "2", "name": "Shirts", "children": null },
            { "id": 3, "name": "Shoes", "children": [
                { "id": 4, "name": "Boots" }
            ]}
        ]},
        { "id": 5, "name": "Gift cards", "children": [] }
    ])
}

#[tokio::test]
async fn test_lists_flattened_leaves() {
    let stub = StubUpstream::spawn(StubBehavior {
        tree: nested_tree(),
        ..StubBehavior::default()
    })
    .await;

    let request = tenant_request("GET", "/categories", "1", "10124")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(stub.gateway(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["error"], 0);
    assert_eq!(
        body["data"],
        json!([
            { "name": "Shirts", "path": "root/Clothing/Shirts", "sourceId": "2" },
            { "name": "Boots", "path": "root/Clothing/Shoes/Boots", "sourceId": "4" },
            { "name": "Gift cards", "path": "root/Gift cards", "sourceId": "5" }
        ])
    );
}

#[tokio::test]
async fn test_deep_tree_is_flattened() {
    const DEPTH: usize = 1_000;

    let mut node = json!({ "id": "leaf", "name": "leaf" });
    for level in 0..DEPTH {
        node = json!({ "id": level, "name": "n", "children": [node] });
    }
    let stub = StubUpstream::spawn(StubBehavior {
        tree: json!([node]),
        ..StubBehavior::default()
    })
    .await;

    let request = tenant_request("GET", "/categories", "1", "10124")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(stub.gateway(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], 0);
    let leaves = body["data"].as_array().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0]["sourceId"], "leaf");
    assert_eq!(
        leaves[0]["path"],
        format!("root/{}leaf", "n/".repeat(DEPTH))
    );
}

#[tokio::test]
async fn test_default_token_is_sent_verbatim() {
    let stub = StubUpstream::spawn(StubBehavior::default()).await;

    let request = tenant_request("GET", "/categories", "1", "10124")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(stub.gateway(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let calls = stub.calls_to("GET", "/categories");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].authorization.as_deref(), Some("DEFAULT"));
}

#[tokio::test]
async fn test_allowed_caller_token_is_forwarded() {
    let stub = StubUpstream::spawn(StubBehavior::default()).await;

    let request = tenant_request("GET", "/categories", "1", "10124")
        .header("Authorization", "Bearer CAT")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(stub.gateway(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stub.calls_to("GET", "/categories")[0].authorization.as_deref(),
        Some("Bearer CAT")
    );
}

#[tokio::test]
async fn test_unknown_caller_token_is_rejected() {
    let stub = StubUpstream::spawn(StubBehavior::default()).await;

    let request = tenant_request("GET", "/categories", "1", "10124")
        .header("Authorization", "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(stub.gateway(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 7);
    assert!(body["data"].is_null());
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_missing_tenant_header_is_bad_request() {
    let stub = StubUpstream::spawn(StubBehavior::default()).await;

    let request = axum::http::Request::get("/categories")
        .header("X-STORE", "1")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(stub.gateway(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], 2);
}

#[tokio::test]
async fn test_upstream_failure_is_generic_error() {
    let stub = StubUpstream::spawn(StubBehavior {
        fail_categories: Some(503),
        ..StubBehavior::default()
    })
    .await;

    let request = tenant_request("GET", "/categories", "1", "10124")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(stub.gateway(), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], 1);
    assert_eq!(body["message"], "Internal error");
}
