//! Storefront handler tests against a wiremock backend.
//!
//! Each test drives one request through the full router (session layer
//! included); `expect(0)` mocks prove guarded mutations never reach the
//! backend.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfusion_storefront::config::{ApiConfig, CartIdentityMode, StorefrontConfig};
use shopfusion_storefront::state::AppState;
use shopfusion_storefront::{middleware, routes};

fn app(backend_url: &str) -> axum::Router {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        api: ApiConfig {
            base_url: backend_url.to_string(),
        },
        cart_identity: CartIdentityMode::PerSession,
        sentry_dsn: None,
        sentry_environment: None,
    };

    let session_layer = middleware::create_session_layer(&config);

    routes::routes()
        .layer(session_layer)
        .with_state(AppState::new(config))
}

fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body))
        .expect("valid request")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn clearing_an_empty_cart_issues_no_request() {
    let server = MockServer::start().await;

    // Fresh session: no snapshot, so even a confirmed clear is a no-op
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(form_post("/cart/clear", "confirmed=true"))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unconfirmed_clear_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(form_post("/cart/clear", ""))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn catalog_backend_failure_renders_error_banner() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(
            Request::builder()
                .uri("/products")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("handler should respond");

    // The page renders with a banner instead of failing the request
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Failed to load products"), "{body}");
    assert!(body.contains("Retry"), "{body}");
}

#[tokio::test]
async fn unknown_product_returns_not_found() {
    let server = MockServer::start().await;

    // No mocks mounted: the backend answers 404 for both the product and
    // its related list
    let response = app(&server.uri())
        .oneshot(
            Request::builder()
                .uri("/products/999")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_start_with_empty_cart_stays_idle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "c1",
            "items": [],
            "itemCount": 0,
            "total": 0.0
        })))
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(form_post("/checkout/start", ""))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("hidden"), "{body}");
    assert!(!body.contains("Processing payment"), "{body}");
}
