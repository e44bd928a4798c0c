//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ShopApi;
use crate::checkout::CheckoutSessions;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend API client, the per-cart checkout machines, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ShopApi,
    checkout: CheckoutSessions,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = ShopApi::new(&config.api);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                checkout: CheckoutSessions::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ShopApi {
        &self.inner.api
    }

    /// Get a reference to the checkout machine registry.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutSessions {
        &self.inner.checkout
    }
}
