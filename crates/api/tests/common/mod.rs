//! Shared helpers for HTTP-level integration tests.
//!
//! Tests run against the in-memory store through the same router and
//! middleware stack production uses; each test constructs a fresh store so
//! there is no cross-test state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use placemark_db::store::MemoryStore;
use tower::ServiceExt;

use placemark_api::relay::RelayHub;
use placemark_api::router::build_app_router;
use placemark_api::state::AppState;

/// Build the application router around a fresh, empty in-memory store.
pub fn build_test_app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

/// Build the application router around a store pre-loaded with the six
/// demo places.
#[allow(dead_code)]
pub fn build_seeded_app() -> Router {
    app_with_store(Arc::new(MemoryStore::with_demo_places()))
}

fn app_with_store(store: Arc<MemoryStore>) -> Router {
    let state = AppState {
        store,
        relay: Arc::new(RelayHub::new()),
    };
    build_app_router(state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    request(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, None).await
}

async fn request(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    };
    app.oneshot(request).await.expect("infallible service")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Assert a 404 response with the given `{"error": ...}` message.
#[allow(dead_code)]
pub async fn assert_not_found(response: Response<Body>, message: &str) {
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], message);
}
