//! Backend API client tests against a wiremock server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfusion_core::{CartItemId, ProductId};
use shopfusion_storefront::api::{ApiError, ShopApi};
use shopfusion_storefront::catalog::{CatalogQuery, SortBy, SortOrder};

fn product_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "price": 19.99,
        "image": "",
        "categoryId": 1,
        "categoryName": "Electronics",
        "stock": 5,
        "rating": 4.0,
        "reviews": 12
    })
}

fn cart_json(total: f64) -> serde_json::Value {
    json!({
        "id": "default-cart",
        "items": [{
            "id": 7,
            "product": product_json(1, "Mug"),
            "quantity": 2
        }],
        "itemCount": 2,
        "total": total
    })
}

#[tokio::test]
async fn products_request_carries_zero_indexed_page_and_combined_sort() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("page", "3"))
        .and(query_param("size", "12"))
        .and(query_param("sort", "price,desc"))
        .and(query_param("category", "2"))
        .and(query_param("search", "desk lamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [product_json(1, "Desk Lamp")],
            "totalPages": 12,
            "totalElements": 137
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    let query = CatalogQuery {
        category: Some(shopfusion_core::CategoryId::new(2)),
        search: Some("desk lamp".to_string()),
        sort_by: SortBy::Price,
        sort_order: SortOrder::Desc,
        page: 4,
        ..CatalogQuery::default()
    };

    let page = api.get_products(&query).await.expect("page should decode");
    assert_eq!(page.total_pages, 12);
    assert_eq!(page.total_elements, 137);
    assert_eq!(page.content.len(), 1);
}

#[tokio::test]
async fn unknown_product_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    let err = api
        .get_product(ProductId::new(999))
        .await
        .expect_err("missing product should error");
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    let err = api
        .get_products(&CatalogQuery::default())
        .await
        .expect_err("500 should error");

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_surfaces_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    let err = api
        .get_product(ProductId::new(1))
        .await
        .expect_err("garbage body should error");
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn non_array_categories_is_malformed_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"oops": true})))
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    let err = api
        .get_categories()
        .await
        .expect_err("object body should error");
    assert!(matches!(err, ApiError::MalformedShape(_)));
}

#[tokio::test]
async fn failed_related_fetch_degrades_to_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/1/related"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    assert!(api.get_related(ProductId::new(1)).await.is_empty());
}

#[tokio::test]
async fn nav_categories_degrade_silently_and_cache_hits() {
    let server = MockServer::start().await;

    // First: unreachable endpoint degrades to empty without caching
    let api = ShopApi::with_base_url(&server.uri());
    assert!(api.nav_categories().await.is_empty());

    // Then: one successful fetch serves repeated calls from the cache
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Electronics", "description": ""}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(api.nav_categories().await.len(), 1);
    assert_eq!(api.nav_categories().await.len(), 1);
}

#[tokio::test]
async fn add_item_posts_camel_case_body_and_returns_fresh_cart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/cart/default-cart/items"))
        .and(body_json(json!({"productId": 1, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(39.98)))
        .expect(1)
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    let cart = api
        .add_item("default-cart", ProductId::new(1), 2)
        .await
        .expect("add should succeed");
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.total, "39.98".parse().unwrap());
}

#[tokio::test]
async fn update_item_puts_quantity() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/cart/default-cart/items/7"))
        .and(body_json(json!({"quantity": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(59.97)))
        .expect(1)
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    let cart = api
        .update_item("default-cart", CartItemId::new(7), 3)
        .await
        .expect("update should succeed");
    assert_eq!(cart.total, "59.97".parse().unwrap());
}

#[tokio::test]
async fn remove_item_and_clear_cart_use_delete() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/cart/default-cart/items/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(0.0)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/cart/default-cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "default-cart",
            "items": [],
            "itemCount": 0,
            "total": 0.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ShopApi::with_base_url(&server.uri());
    api.remove_item("default-cart", CartItemId::new(7))
        .await
        .expect("remove should succeed");

    let cart = api
        .clear_cart("default-cart")
        .await
        .expect("clear should succeed");
    assert!(cart.items.is_empty());
    assert_eq!(cart.item_count, 0);
}
