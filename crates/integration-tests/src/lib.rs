//! Integration test support for the catalog gateway.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-gateway-integration-tests
//! ```
//!
//! No external services are needed: each test spawns a [`StubUpstream`] on a
//! loopback port, points a real [`UpstreamClient`] at it, and drives the
//! gateway router in-process with `tower::ServiceExt::oneshot`.
//!
//! [`UpstreamClient`]: catalog_gateway::upstream::UpstreamClient

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use catalog_gateway::config::{ConfigError, GatewayConfig};
use catalog_gateway::db::InMemoryConfigurationStore;
use catalog_gateway::state::AppState;
use catalog_gateway::upstream::{UpstreamClient, UpstreamError};

/// Canned responses for the stub upstream.
#[derive(Debug, Clone)]
pub struct StubBehavior {
    /// `shops` array returned by the account info endpoint.
    pub shops: Value,
    /// Category tree returned by the categories endpoint.
    pub tree: Value,
    /// Id returned by product creation.
    pub created_id: Value,
    /// Quantity echoed by the quantity endpoint; `None` omits the field.
    pub acked_quantity: Option<i32>,
    pub fail_account: Option<u16>,
    pub fail_categories: Option<u16>,
    pub fail_create: Option<u16>,
    pub fail_update: Option<u16>,
    pub fail_quantity: Option<u16>,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            shops: json!([{ "id": 10124, "name": "Main", "status": "ACTIVE", "vatNumber": "IT1" }]),
            tree: json!([]),
            created_id: json!(555),
            acked_quantity: None,
            fail_account: None,
            fail_categories: None,
            fail_create: None,
            fail_update: None,
            fail_quantity: None,
        }
    }
}

/// One request received by the stub upstream.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    behavior: Arc<StubBehavior>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl StubState {
    fn record(&self, method: &str, path: String, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                method: method.to_string(),
                path,
                authorization,
                body,
            });
    }
}

/// Upstream API stand-in served from a loopback port.
pub struct StubUpstream {
    base_url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl StubUpstream {
    /// Spawn the stub on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the loopback listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn(behavior: StubBehavior) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            behavior: Arc::new(behavior),
            calls: calls.clone(),
        };

        let router = Router::new()
            .route("/accounts/info", get(stub_account_info))
            .route("/categories", get(stub_categories))
            .route("/products", post(stub_create))
            .route("/products/{id}", put(stub_update))
            .route("/products/{id}/quantity", put(stub_quantity))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            calls,
        }
    }

    /// Base URL of the stub, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received so far whose path equals `path`.
    #[must_use]
    pub fn calls_to(&self, method: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method && call.path == path)
            .collect()
    }

    /// Gateway variables pointing every upstream endpoint at this stub.
    #[must_use]
    pub fn env(&self) -> HashMap<String, String> {
        let base = &self.base_url;
        HashMap::from([
            ("UPSTREAM_ACCOUNT_INFO_URL".to_string(), format!("{base}/accounts/info")),
            ("UPSTREAM_CATEGORIES_URL".to_string(), format!("{base}/categories")),
            ("UPSTREAM_PRODUCT_CREATE_URL".to_string(), format!("{base}/products")),
            ("UPSTREAM_PRODUCT_UPDATE_URL".to_string(), format!("{base}/products/{{id}}")),
            (
                "UPSTREAM_PRODUCT_QUANTITY_URL".to_string(),
                format!("{base}/products/{{id}}/quantity"),
            ),
            ("UPSTREAM_TIMEOUT_SECS".to_string(), "5".to_string()),
            ("GATEWAY_DEFAULT_TOKEN".to_string(), "DEFAULT".to_string()),
            ("GATEWAY_SOURCE_TOKENS".to_string(), "T1,T2".to_string()),
            ("GATEWAY_CATEGORY_TOKENS".to_string(), "CAT".to_string()),
        ])
    }

    /// Load gateway configuration from [`Self::env`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the variables are rejected.
    pub fn config(&self) -> Result<GatewayConfig, ConfigError> {
        let vars = self.env();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    /// A real upstream client pointed at this stub.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError` if the client cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if the stub configuration is rejected.
    #[allow(clippy::unwrap_used)]
    pub fn client(&self) -> Result<UpstreamClient, UpstreamError> {
        UpstreamClient::new(&self.config().unwrap().upstream)
    }

    /// Gateway router backed by this stub and an in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if the stub configuration is rejected.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn gateway(&self) -> Router {
        let config = self.config().unwrap();
        let upstream = Arc::new(UpstreamClient::new(&config.upstream).unwrap());
        let store = Arc::new(InMemoryConfigurationStore::new());

        catalog_gateway::routes::app(AppState::new(config, store, upstream))
    }
}

fn failure(status: u16) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "message": "stub failure" }))).into_response()
}

async fn stub_account_info(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("GET", "/accounts/info".to_string(), &headers, Value::Null);
    if let Some(status) = state.behavior.fail_account {
        return failure(status);
    }
    Json(json!({ "active": true, "shops": state.behavior.shops })).into_response()
}

async fn stub_categories(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("GET", "/categories".to_string(), &headers, Value::Null);
    if let Some(status) = state.behavior.fail_categories {
        return failure(status);
    }
    Json(state.behavior.tree.clone()).into_response()
}

async fn stub_create(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/products".to_string(), &headers, body);
    if let Some(status) = state.behavior.fail_create {
        return failure(status);
    }
    Json(json!({ "id": state.behavior.created_id })).into_response()
}

async fn stub_update(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("PUT", format!("/products/{id}"), &headers, body);
    if let Some(status) = state.behavior.fail_update {
        return failure(status);
    }
    Json(json!({ "id": id })).into_response()
}

async fn stub_quantity(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("PUT", format!("/products/{id}/quantity"), &headers, body);
    if let Some(status) = state.behavior.fail_quantity {
        return failure(status);
    }
    match state.behavior.acked_quantity {
        Some(quantity) => Json(json!({ "id": id, "quantity": quantity })).into_response(),
        None => Json(json!({ "id": id })).into_response(),
    }
}

/// Send `request` through `app` and decode the JSON body.
///
/// Non-JSON bodies decode to `Value::String`.
///
/// # Panics
///
/// Panics if the router fails or the body cannot be read.
#[allow(clippy::unwrap_used)]
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, headers, body)
}

/// Start a request carrying the tenant headers.
#[must_use]
pub fn tenant_request(method: &str, uri: &str, store: &str, source: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-STORE", store)
        .header("X-SOURCE", source)
}

/// Build a JSON request body.
#[must_use]
pub fn json_body(value: &Value) -> Body {
    Body::from(value.to_string())
}
