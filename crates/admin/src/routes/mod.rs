//! HTTP route handlers for the admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to the product list
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (backend reachable)
//!
//! # Products
//! GET  /products                  - Paginated product list (page size 10)
//! GET  /products/new              - Create form
//! POST /products                  - Create (validated; re-renders on error)
//! GET  /products/{id}/edit        - Edit form
//! POST /products/{id}            - Update
//! POST /products/{id}/delete      - Delete, confirmation-gated
//!
//! # Categories
//! GET  /categories                - Category list
//! GET  /categories/new            - Create form
//! POST /categories                - Create
//! GET  /categories/{id}/edit      - Edit form
//! POST /categories/{id}          - Update
//! POST /categories/{id}/delete    - Delete, confirmation-gated
//! ```
//!
//! Every mutation redirects back to its list page, which refetches; there is
//! no optimistic update. Success and failure flash messages ride the redirect
//! as query parameters.

pub mod categories;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_form))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_form))
        .route("/{id}/delete", post(products::delete))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/new", get(categories::new_form))
        .route("/{id}", post(categories::update))
        .route("/{id}/edit", get(categories::edit_form))
        .route("/{id}/delete", post(categories::delete))
}

/// Create all routes for the admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
}
