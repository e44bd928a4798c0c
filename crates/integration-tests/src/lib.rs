//! Integration tests for ShopFusion.
//!
//! These tests exercise running storefront and admin servers end to end and
//! are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the backend, storefront, and admin, then:
//! cargo test -p shopfusion-integration-tests -- --ignored
//! ```
//!
//! Server locations are configurable via `STOREFRONT_BASE_URL` and
//! `ADMIN_BASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Shared context for end-to-end tests.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub admin_url: String,
}

impl TestContext {
    /// Build a context from environment variables with localhost defaults.
    ///
    /// The client keeps cookies so storefront cart state persists across
    /// requests within one test.
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_default();

        Self {
            client,
            storefront_url: std::env::var("STOREFRONT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_url: std::env::var("ADMIN_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
