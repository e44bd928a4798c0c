//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (backend reachable)
//!
//! # Catalog
//! GET  /products               - Catalog listing (filters/sort/page in query)
//! GET  /products/{id}          - Product detail with related products
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! GET  /cart/items             - Cart items fragment
//! POST /cart/add               - Add to cart (returns count, triggers cart-updated)
//! POST /cart/update            - Set quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Clear cart, confirmation-gated (fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout simulation (HTMX fragments)
//! POST /checkout/start         - Begin the simulated checkout
//! GET  /checkout/status        - Current modal state (polled)
//! POST /checkout/retry         - Retry after a declined payment
//! POST /checkout/close         - Close the modal (never clears the cart)
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;
pub mod shell;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/start", post(checkout::start))
        .route("/status", get(checkout::status))
        .route("/retry", post(checkout::retry))
        .route("/close", post(checkout::close))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
