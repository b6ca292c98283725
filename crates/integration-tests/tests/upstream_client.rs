//! Integration tests for the `reqwest` upstream client against the stub.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;

use catalog_gateway::upstream::{
    AuthToken, CatalogGateway, ProductWrite, QuantityUpdate, UpstreamError,
};
use catalog_gateway_core::{Price, ProductDraft, ShopId, VatRate};
use catalog_gateway_integration_tests::{StubBehavior, StubUpstream};

fn token() -> AuthToken {
    AuthToken::bearer(SecretString::from("secret"))
}

fn write() -> ProductWrite {
    let draft = ProductDraft {
        title: "Product A".to_string(),
        category_source_id: "Category1".to_string(),
        price: Price::new(Decimal::new(1999, 2)),
        vat_rate: VatRate::new(Decimal::new(22, 0)),
        quantity: 1,
        upstream_product_id: None,
    };
    ProductWrite::from_draft(&draft, 10124)
}

#[tokio::test]
async fn test_account_info_decodes_numeric_shop_ids() {
    let stub = StubUpstream::spawn(StubBehavior::default()).await;
    let client = stub.client().unwrap();

    let info = client.account_info(&token()).await.unwrap();

    assert!(info.active);
    assert!(info.find_shop(&ShopId::new("10124")).is_some());
    assert_eq!(
        stub.calls()[0].authorization.as_deref(),
        Some("Bearer secret")
    );
}

#[tokio::test]
async fn test_categories_decodes_tree() {
    let stub = StubUpstream::spawn(StubBehavior {
        tree: json!([{ "id": 1, "name": "A", "children": [{ "id": 2, "name": "B" }] }]),
        ..StubBehavior::default()
    })
    .await;

    let tree = stub.client().unwrap().categories(&token()).await.unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].id, "1");
    assert!(!tree[0].is_leaf());
}

#[tokio::test]
async fn test_create_returns_string_id_for_numeric_response() {
    let stub = StubUpstream::spawn(StubBehavior::default()).await;

    let product = stub
        .client()
        .unwrap()
        .create_product(&token(), &write())
        .await
        .unwrap();

    assert_eq!(product.id, "555");
    assert_eq!(stub.calls()[0].body["offer"]["price"], 19.99);
}

#[tokio::test]
async fn test_update_and_quantity_substitute_product_id() {
    let stub = StubUpstream::spawn(StubBehavior {
        acked_quantity: Some(8),
        ..StubBehavior::default()
    })
    .await;
    let client = stub.client().unwrap();

    let product = client
        .update_product(&token(), "77", &write())
        .await
        .unwrap();
    let ack = client
        .update_quantity(
            &token(),
            &product.id,
            &QuantityUpdate {
                quantity: 8,
                shop_id: 77,
            },
        )
        .await
        .unwrap();

    assert_eq!(ack.quantity, Some(8));
    assert_eq!(stub.calls_to("PUT", "/products/77").len(), 1);
    assert_eq!(stub.calls_to("PUT", "/products/77/quantity").len(), 1);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let stub = StubUpstream::spawn(StubBehavior {
        fail_create: Some(422),
        ..StubBehavior::default()
    })
    .await;

    let err = stub
        .client()
        .unwrap()
        .create_product(&token(), &write())
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Status { status: 422, .. }));
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let stub = StubUpstream::spawn(StubBehavior {
        tree: json!({ "not": "a list" }),
        ..StubBehavior::default()
    })
    .await;

    let err = stub.client().unwrap().categories(&token()).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_upstream_is_http_error() {
    let stub = StubUpstream::spawn(StubBehavior::default()).await;
    let mut vars = stub.env();
    // Port 9 on loopback (discard) is not served by the stub
    vars.insert(
        "UPSTREAM_CATEGORIES_URL".to_string(),
        "http://127.0.0.1:9/categories".to_string(),
    );
    let config =
        catalog_gateway::config::GatewayConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let client = catalog_gateway::upstream::UpstreamClient::new(&config.upstream).unwrap();

    let err = client.categories(&token()).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Http(_)));
}
